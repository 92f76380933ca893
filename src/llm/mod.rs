//! LLM呼び出しモジュール
//!
//! - OpenAiClient: Chat Completions API（HTTP）
//! - CliClient: ローカルのエージェントCLI（claude / codex）
//!
//! 認証情報は環境変数から読まず、コンストラクタで受け取る。

mod cli_runner;
mod openai;

pub use cli_runner::CliClient;
pub use openai::OpenAiClient;

use crate::config::Config;
use crate::error::Result;
use async_trait::async_trait;

/// 1回分の補完リクエスト
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub model: String,
    pub system: String,
    pub user: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// 生成パラメータ
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for GenerationSettings {
    fn from(config: &Config) -> Self {
        Self {
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }
}

impl GenerationSettings {
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn request(&self, system: String, user: String) -> CompletionRequest {
        CompletionRequest {
            model: self.model.clone(),
            system,
            user,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }
}

/// テキスト補完サービス
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// 表示用のプロバイダ名
    fn name(&self) -> &str;

    /// 補完テキストを取得
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_from_config() {
        let config = Config {
            model: "gpt-4o-mini".into(),
            max_tokens: 500,
            ..Default::default()
        };
        let settings = GenerationSettings::from(&config).with_temperature(0.2);
        assert_eq!(settings.model, "gpt-4o-mini");
        assert_eq!(settings.max_tokens, 500);
        assert_eq!(settings.temperature, 0.2);

        let request = settings.request("sys".into(), "user".into());
        assert_eq!(request.model, "gpt-4o-mini");
        assert_eq!(request.system, "sys");
    }
}
