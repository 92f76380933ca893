use super::{non_empty_reply, now_timestamp, Capabilities};
use crate::error::{MinamError, Result};
use crate::llm::{CompletionClient, GenerationSettings};
use minam_common::{
    build_multi_file_system_prompt, build_multi_file_user_prompt, extract_file_references, find_connections,
    ConversationMessage, ParsedDataset, RelationshipEvidence, Role,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// 複数ファイルへの質問
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MultiFileQuery {
    pub query: String,
    pub files: Vec<ParsedDataset>,
    pub conversation_history: Vec<ConversationMessage>,
    pub selected_file_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiFileAnswer {
    pub success: bool,
    pub response: String,
    pub query: String,
    pub file_references: Vec<String>,
    pub connections: Vec<RelationshipEvidence>,
    pub timestamp: String,
}

pub struct MultiFileAgent {
    client: Arc<dyn CompletionClient>,
    settings: GenerationSettings,
}

impl MultiFileAgent {
    pub fn new(client: Arc<dyn CompletionClient>, settings: GenerationSettings) -> Self {
        Self { client, settings }
    }

    pub async fn ask(&self, request: MultiFileQuery) -> Result<MultiFileAnswer> {
        if request.query.trim().is_empty() {
            return Err(MinamError::InvalidRequest("Query is required".into()));
        }

        let connections = find_connections(&request.files);
        tracing::info!(
            files = request.files.len(),
            connections = connections.len(),
            provider = self.client.name(),
            "multi-file query"
        );

        let system = build_multi_file_system_prompt(
            &request.files,
            &connections,
            &request.conversation_history,
            request.selected_file_id.as_deref(),
        );
        let user = build_multi_file_user_prompt(&request.query);

        let response = self.client.complete(&self.settings.request(system, user)).await?;
        let response = non_empty_reply(self.client.as_ref(), response)?;

        let file_references = extract_file_references(&response, &request.files);

        Ok(MultiFileAnswer {
            success: true,
            response,
            query: request.query,
            file_references,
            connections,
            timestamp: now_timestamp(),
        })
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            message: "Multi-File AI Agent is ready",
            capabilities: vec![
                "Multi-file analysis",
                "Cross-file connections",
                "General knowledge integration",
                "Conversation memory",
                "File relationship detection",
                "Pattern recognition across files",
            ],
            supported_formats: vec!["xlsx", "xls", "csv", "pdf"],
            model: self.settings.model.clone(),
        }
    }
}

/// 1往復分の発話を会話履歴に追加
pub fn record_turn(history: &mut Vec<ConversationMessage>, answer: &MultiFileAnswer) {
    history.push(ConversationMessage {
        role: Role::User,
        content: answer.query.clone(),
        timestamp: answer.timestamp.clone(),
        file_references: None,
    });
    history.push(ConversationMessage {
        role: Role::Assistant,
        content: answer.response.clone(),
        timestamp: answer.timestamp.clone(),
        file_references: Some(answer.file_references.clone()),
    });
}
