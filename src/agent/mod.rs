//! AIエージェント
//!
//! - MultiFileAgent: 複数データセットを横断した質問応答
//! - ExcelAgent: 単一ファイル（テキスト化済み）への質問応答
//! - FileAnalysisAgent: データ検証レポートの生成
//!
//! いずれも `CompletionClient` を共有し、状態を持たない。

mod excel;
mod multi_file;
mod validation;

pub use excel::{ExcelAgent, ExcelAnswer, ExcelQuery};
pub use multi_file::{record_turn, MultiFileAgent, MultiFileAnswer, MultiFileQuery};
pub use validation::{AnalyzeFileRequest, FileAnalysisAgent, DATA_VALIDATION};

use crate::error::{MinamError, Result};
use crate::llm::CompletionClient;
use serde::Serialize;

/// エージェントの能力記述（GETエンドポイントの応答）
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
    pub message: &'static str,
    pub capabilities: Vec<&'static str>,
    pub supported_formats: Vec<&'static str>,
    pub model: String,
}

pub(crate) fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// 空応答をエラーにする（メッセージにはプロバイダ名を含める）
fn non_empty_reply(client: &dyn CompletionClient, response: String) -> Result<String> {
    if response.trim().is_empty() {
        return Err(MinamError::ApiParse(format!("No response from {}", client.name())));
    }
    Ok(response)
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::error::{MinamError, Result};
    use crate::llm::{CompletionClient, CompletionRequest};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// 固定応答を返すクライアント（最後のリクエストを記録）
    pub struct FakeClient {
        pub reply: String,
        pub last_request: Mutex<Option<CompletionRequest>>,
    }

    impl FakeClient {
        pub fn new(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                last_request: Mutex::new(None),
            }
        }

        pub fn last(&self) -> CompletionRequest {
            self.last_request.lock().unwrap().clone().unwrap()
        }
    }

    #[async_trait]
    impl CompletionClient for FakeClient {
        fn name(&self) -> &str {
            "fake"
        }

        async fn complete(&self, request: &CompletionRequest) -> Result<String> {
            *self.last_request.lock().unwrap() = Some(request.clone());
            Ok(self.reply.clone())
        }
    }

    pub struct FailingClient;

    #[async_trait]
    impl CompletionClient for FailingClient {
        fn name(&self) -> &str {
            "failing"
        }

        async fn complete(&self, _request: &CompletionRequest) -> Result<String> {
            Err(MinamError::ApiCall("upstream down".into()))
        }
    }
}
