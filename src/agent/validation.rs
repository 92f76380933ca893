use super::non_empty_reply;
use crate::error::{MinamError, Result};
use crate::llm::{CompletionClient, GenerationSettings};
use minam_common::{
    build_validation_system_prompt, build_validation_user_prompt, parse_validation_report, ParsedDataset,
    ValidationReport,
};
use serde::Deserialize;
use std::sync::Arc;

/// 受け付ける解析種別
pub const DATA_VALIDATION: &str = "data-validation";

const VALIDATION_MAX_TOKENS: u32 = 500;
const VALIDATION_TEMPERATURE: f32 = 0.1;

/// ファイル解析リクエスト
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyzeFileRequest {
    pub file_data: Option<ParsedDataset>,
    pub analysis_type: String,
}

impl AnalyzeFileRequest {
    pub fn data_validation(dataset: ParsedDataset) -> Self {
        Self {
            file_data: Some(dataset),
            analysis_type: DATA_VALIDATION.to_string(),
        }
    }
}

/// データ検証エージェント
///
/// 応答からJSONを取り出して `ValidationReport` に変換する。
/// 解釈できない応答は既定レポートに置き換える。
pub struct FileAnalysisAgent {
    client: Arc<dyn CompletionClient>,
    settings: GenerationSettings,
}

impl FileAnalysisAgent {
    pub fn new(client: Arc<dyn CompletionClient>, settings: GenerationSettings) -> Self {
        let settings = settings
            .with_max_tokens(VALIDATION_MAX_TOKENS)
            .with_temperature(VALIDATION_TEMPERATURE);
        Self { client, settings }
    }

    pub async fn analyze(&self, request: AnalyzeFileRequest) -> Result<ValidationReport> {
        let dataset = request
            .file_data
            .ok_or_else(|| MinamError::InvalidRequest("File data is required".into()))?;
        if request.analysis_type != DATA_VALIDATION {
            return Err(MinamError::InvalidRequest("Invalid analysis type".into()));
        }

        tracing::info!(
            file = %dataset.file_name,
            rows = dataset.total_rows,
            provider = self.client.name(),
            "data validation"
        );

        let system = build_validation_system_prompt().to_string();
        let user = build_validation_user_prompt(&dataset)?;

        let response = self.client.complete(&self.settings.request(system, user)).await?;
        let response = non_empty_reply(self.client.as_ref(), response)?;

        match parse_validation_report(&response) {
            Ok(report) => Ok(report),
            Err(e) => {
                tracing::warn!(error = %e, "検証レポートを解釈できないため既定値を返します");
                Ok(ValidationReport::fallback(&dataset))
            }
        }
    }
}
