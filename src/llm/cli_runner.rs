//! ローカルのエージェントCLI（claude / codex）連携
//!
//! system と user を1つのプロンプトにまとめて `-p`（codexは `exec`）で渡し、
//! 標準出力をそのまま応答として扱う。

use super::{CompletionClient, CompletionRequest};
use crate::error::{MinamError, Result};
use async_trait::async_trait;
use tokio::process::Command;

/// エージェントCLIクライアント
pub struct CliClient {
    program: &'static str,
    base_args: &'static [&'static str],
    trailing_args: &'static [&'static str],
}

impl CliClient {
    pub fn claude() -> Self {
        Self {
            program: "claude",
            base_args: &["-p"],
            trailing_args: &["--output-format", "text"],
        }
    }

    pub fn codex() -> Self {
        Self {
            program: "codex",
            base_args: &["exec"],
            trailing_args: &[],
        }
    }

    fn args(&self, prompt: &str) -> Vec<String> {
        self.base_args
            .iter()
            .map(|s| s.to_string())
            .chain(std::iter::once(prompt.to_string()))
            .chain(self.trailing_args.iter().map(|s| s.to_string()))
            .collect()
    }
}

/// system/user を1つのプロンプトに結合
///
/// Windowsでは cmd 経由になるため改行をスペースに置換し、ダブルクォートをエスケープする。
fn combine_prompt(request: &CompletionRequest) -> String {
    let raw = format!("{}\n\n{}", request.system, request.user);
    if cfg!(windows) {
        raw.replace('\n', " ").replace('"', "\\\"")
    } else {
        raw
    }
}

#[async_trait]
impl CompletionClient for CliClient {
    fn name(&self) -> &str {
        self.program
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let prompt = combine_prompt(request);
        let args = self.args(&prompt);

        tracing::debug!(program = self.program, prompt_chars = prompt.len(), "agent CLI call");

        // Windowsではcmd /c経由
        #[cfg(windows)]
        let output = Command::new("cmd")
            .arg("/c")
            .arg(self.program)
            .args(&args)
            .output()
            .await;

        #[cfg(not(windows))]
        let output = Command::new(self.program).args(&args).output().await;

        let output = output
            .map_err(|e| MinamError::CliExecution(format!("{} 実行エラー: {}", self.program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MinamError::CliExecution(format!(
                "{} failed (code {:?}): {}",
                self.program,
                output.status.code(),
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        tracing::debug!(program = self.program, response_chars = stdout.len(), "agent CLI response");
        Ok(stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CompletionRequest {
        CompletionRequest {
            model: "gpt-4o".into(),
            system: "You are helpful".into(),
            user: "What connects these files?".into(),
            max_tokens: 100,
            temperature: 0.1,
        }
    }

    #[test]
    fn test_claude_args() {
        let args = CliClient::claude().args("hello");
        assert_eq!(args, vec!["-p", "hello", "--output-format", "text"]);
    }

    #[test]
    fn test_codex_args() {
        let args = CliClient::codex().args("hello");
        assert_eq!(args, vec!["exec", "hello"]);
    }

    #[test]
    fn test_combine_prompt_contains_both_parts() {
        let prompt = combine_prompt(&request());
        assert!(prompt.contains("You are helpful"));
        assert!(prompt.contains("What connects these files?"));
    }

    #[tokio::test]
    async fn test_missing_program_is_cli_error() {
        let client = CliClient {
            program: "minam-nonexistent-agent-cli",
            base_args: &[],
            trailing_args: &[],
        };
        let err = client.complete(&request()).await.unwrap_err();
        assert!(matches!(err, MinamError::CliExecution(_)));
    }
}
