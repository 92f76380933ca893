use crate::config::Config;
use crate::error::Result;
use crate::llm::{CliClient, CompletionClient, OpenAiClient};
use clap::ValueEnum;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum AiProvider {
    /// OpenAI互換 Chat Completions API
    #[default]
    Openai,
    /// ローカルの claude CLI
    Claude,
    /// ローカルの codex CLI
    Codex,
}

impl AiProvider {
    /// プロバイダに応じたクライアントを生成
    ///
    /// APIキーはここで1回だけ解決してクライアントに渡す。
    pub fn build_client(&self, config: &Config) -> Result<Arc<dyn CompletionClient>> {
        let client: Arc<dyn CompletionClient> = match self {
            AiProvider::Openai => Arc::new(OpenAiClient::new(
                config.resolve_api_key()?,
                config.base_url.clone(),
                Duration::from_secs(config.timeout_seconds),
            )?),
            AiProvider::Claude => Arc::new(CliClient::claude()),
            AiProvider::Codex => Arc::new(CliClient::codex()),
        };
        Ok(client)
    }
}
