use super::{CompletionClient, CompletionRequest};
use crate::error::{MinamError, Result};
use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;

/// OpenAI互換 Chat Completions クライアント
pub struct OpenAiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(api_key: String, base_url: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MinamError::ApiCall(format!("HTTPクライアント生成エラー: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            base_url,
        })
    }

    fn endpoint(&self) -> String {
        chat_completions_url(&self.base_url)
    }
}

fn chat_completions_url(base_url: &str) -> String {
    format!("{}/chat/completions", base_url.trim_end_matches('/'))
}

/// レスポンスJSONから本文を取り出す
fn extract_content(payload: &serde_json::Value) -> Result<String> {
    payload["choices"][0]["message"]["content"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| MinamError::ApiParse("choices[0].message.content がありません".into()))
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let body = json!({
            "model": request.model,
            "messages": [
                { "role": "system", "content": request.system },
                { "role": "user", "content": request.user }
            ],
            "max_tokens": request.max_tokens,
            "temperature": request.temperature,
        });

        tracing::debug!(
            model = %request.model,
            system_chars = request.system.len(),
            user_chars = request.user.len(),
            "chat completion request"
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| MinamError::ApiCall(format!("リクエスト失敗: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(MinamError::ApiCall(format!("OpenAI API error ({}): {}", status, text)));
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| MinamError::ApiParse(format!("JSONパースエラー: {}", e)))?;

        let content = extract_content(&payload)?;
        tracing::debug!(response_chars = content.len(), "chat completion response");
        Ok(content)
    }
}
