use crate::ai_provider::AiProvider;
use crate::export::ReportFormat;
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "minam")]
#[command(about = "表計算データの接続解析・AIデータエージェント", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// AIプロバイダ (openai/claude/codex)
    #[arg(long, value_enum, default_value = "openai", global = true)]
    pub ai_provider: AiProvider,
}

#[derive(Subcommand)]
pub enum Commands {
    /// データセット間の接続を検出
    Connections {
        /// 入力ファイル/フォルダ
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// サブフォルダも再帰的にスキャン
        #[arg(short = 'r', long)]
        recursive: bool,

        /// 出力形式 (text/json/excel)
        #[arg(short, long, default_value = "text")]
        format: ReportFormat,

        /// 出力ファイル/ディレクトリ（省略時は標準出力）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 1ファイルの内容と概要を表示
    Inspect {
        /// 入力ファイル
        #[arg(required = true)]
        path: PathBuf,
    },

    /// 複数ファイルについてAIに1回質問
    Ask {
        /// 入力ファイル/フォルダ
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// 質問
        #[arg(short, long)]
        query: String,

        /// 注目するファイル（ファイル名またはID）
        #[arg(long)]
        file: Option<String>,

        /// サブフォルダも再帰的にスキャン
        #[arg(short = 'r', long)]
        recursive: bool,
    },

    /// 複数ファイルについてAIと対話
    Chat {
        /// 入力ファイル/フォルダ
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// サブフォルダも再帰的にスキャン
        #[arg(short = 'r', long)]
        recursive: bool,
    },

    /// 単一ファイルについてAIに質問
    Excel {
        /// 入力ファイル
        #[arg(required = true)]
        path: PathBuf,

        /// 質問
        #[arg(short, long)]
        query: String,
    },

    /// 単一ファイルのデータ品質をAIで検証
    Validate {
        /// 入力ファイル
        #[arg(required = true)]
        path: PathBuf,
    },

    /// HTTPサーバーを起動
    Serve {
        /// 待ち受けアドレス
        #[arg(long, default_value = "0.0.0.0:8787")]
        addr: SocketAddr,
    },

    /// 設定を表示/編集
    Config {
        /// APIキーを設定
        #[arg(long)]
        set_api_key: Option<String>,

        /// モデルを設定
        #[arg(long)]
        set_model: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_connections() {
        let cli = Cli::try_parse_from(["minam", "connections", "a.csv", "b.xlsx", "-f", "json"]).unwrap();
        match cli.command {
            Commands::Connections { paths, format, recursive, output } => {
                assert_eq!(paths.len(), 2);
                assert_eq!(format, ReportFormat::Json);
                assert!(!recursive);
                assert!(output.is_none());
            }
            _ => panic!("unexpected command"),
        }
    }

    #[test]
    fn test_parse_global_provider() {
        let cli = Cli::try_parse_from(["minam", "ask", "data", "-q", "hi", "--ai-provider", "claude"]).unwrap();
        assert!(matches!(cli.ai_provider, AiProvider::Claude));
    }

    #[test]
    fn test_serve_default_addr() {
        let cli = Cli::try_parse_from(["minam", "serve"]).unwrap();
        match cli.command {
            Commands::Serve { addr } => assert_eq!(addr.port(), 8787),
            _ => panic!("unexpected command"),
        }
    }

    #[test]
    fn test_parse_validate() {
        let cli = Cli::try_parse_from(["minam", "validate", "trades.xlsx"]).unwrap();
        match cli.command {
            Commands::Validate { path } => assert_eq!(path, PathBuf::from("trades.xlsx")),
            _ => panic!("unexpected command"),
        }
        assert!(Cli::try_parse_from(["minam", "validate"]).is_err());
    }

    #[test]
    fn test_unknown_format_rejected() {
        assert!(Cli::try_parse_from(["minam", "connections", "a.csv", "-f", "pdf"]).is_err());
    }
}
