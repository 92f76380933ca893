use super::{non_empty_reply, now_timestamp, Capabilities};
use crate::error::{MinamError, Result};
use crate::llm::{CompletionClient, GenerationSettings};
use minam_common::{build_excel_agent_system_prompt, build_excel_agent_user_prompt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// 単一ファイルへの質問（`file_content` は `format_dataset_for_ai` 等でテキスト化済み）
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExcelQuery {
    pub query: String,
    pub file_content: String,
    pub file_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExcelAnswer {
    pub success: bool,
    pub response: String,
    pub query: String,
    pub file_name: Option<String>,
    pub timestamp: String,
    pub model: String,
}

pub struct ExcelAgent {
    client: Arc<dyn CompletionClient>,
    settings: GenerationSettings,
}

impl ExcelAgent {
    pub fn new(client: Arc<dyn CompletionClient>, settings: GenerationSettings) -> Self {
        Self { client, settings }
    }

    pub async fn ask(&self, request: ExcelQuery) -> Result<ExcelAnswer> {
        if request.query.trim().is_empty() {
            return Err(MinamError::InvalidRequest("Query is required".into()));
        }
        if request.file_content.trim().is_empty() {
            return Err(MinamError::InvalidRequest("File content is required".into()));
        }

        tracing::info!(
            file = request.file_name.as_deref().unwrap_or("Unknown"),
            content_chars = request.file_content.len(),
            provider = self.client.name(),
            "excel agent query"
        );

        let system = build_excel_agent_system_prompt(request.file_name.as_deref());
        let user = build_excel_agent_user_prompt(&request.query, &request.file_content);

        let response = self.client.complete(&self.settings.request(system, user)).await?;
        let response = non_empty_reply(self.client.as_ref(), response)?;

        Ok(ExcelAnswer {
            success: true,
            response,
            query: request.query,
            file_name: request.file_name,
            timestamp: now_timestamp(),
            model: self.settings.model.clone(),
        })
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            message: "Excel AI Agent is ready",
            capabilities: vec![
                "Excel file analysis",
                "Data pattern recognition",
                "Statistical calculations",
                "Trend identification",
                "Data visualization suggestions",
                "Query answering",
            ],
            supported_formats: vec!["xlsx", "xls", "csv"],
            model: self.settings.model.clone(),
        }
    }
}
