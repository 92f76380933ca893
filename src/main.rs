use anyhow::Context;
use clap::Parser;
use dialoguer::Input;
use minam::agent::{
    record_turn, AnalyzeFileRequest, ExcelAgent, ExcelQuery, FileAnalysisAgent, MultiFileAgent, MultiFileQuery,
};
use minam::llm::GenerationSettings;
use minam::{cli, config, error, export, insights, loader, progress, scanner, server};
use cli::{Cli, Commands};
use config::Config;
use minam_common::{find_connections, format_dataset_for_ai, ParsedDataset};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load().context("設定ファイルの読み込みに失敗しました")?;

    match cli.command {
        Commands::Connections { paths, recursive, format, output } => {
            println!("🔗 minam - 接続解析\n");

            let datasets = load_inputs(&paths, recursive)?;
            let connections = find_connections(&datasets);
            println!("✔ {}件の接続を検出\n", connections.len());

            if let Some(path) = export::export_report(&datasets, &connections, format, output.as_deref())? {
                println!("\n✔ レポート出力: {}", path.display());
            }
        }

        Commands::Inspect { path } => {
            let datasets = load_inputs(&[path], false)?;
            for dataset in &datasets {
                println!("{}", format_dataset_for_ai(dataset));
                println!("概要:");
                for line in insights::extract_data_insights(dataset) {
                    println!("  - {}", line);
                }
            }
        }

        Commands::Ask { paths, query, file, recursive } => {
            println!("💬 minam - マルチファイル質問\n");

            let datasets = load_inputs(&paths, recursive)?;
            let selected_file_id = match file.as_deref() {
                Some(key) => Some(select_file(&datasets, key)?),
                None => None,
            };

            let client = cli.ai_provider.build_client(&config)?;
            let agent = MultiFileAgent::new(client, GenerationSettings::from(&config));

            let spinner = progress::spinner("AIが回答を作成中...");
            let answer = agent
                .ask(MultiFileQuery {
                    query,
                    files: datasets,
                    conversation_history: Vec::new(),
                    selected_file_id,
                })
                .await;
            spinner.finish_and_clear();
            let answer = answer?;

            print_connections_summary(answer.connections.len());
            println!("{}\n", answer.response);
            if !answer.file_references.is_empty() {
                println!("参照ファイル: {}", answer.file_references.join(", "));
            }
        }

        Commands::Chat { paths, recursive } => {
            println!("💬 minam - 対話モード（空行または exit で終了）\n");

            let datasets = load_inputs(&paths, recursive)?;
            let client = cli.ai_provider.build_client(&config)?;
            let agent = MultiFileAgent::new(client, GenerationSettings::from(&config));
            let mut history = Vec::new();

            loop {
                let input: String = Input::new()
                    .with_prompt("質問")
                    .allow_empty(true)
                    .interact_text()
                    .map_err(|e| error::MinamError::CliExecution(e.to_string()))?;

                let query = input.trim();
                if query.is_empty() || query.eq_ignore_ascii_case("exit") {
                    println!("終了します");
                    break;
                }

                let spinner = progress::spinner("AIが回答を作成中...");
                let answer = agent
                    .ask(MultiFileQuery {
                        query: query.to_string(),
                        files: datasets.clone(),
                        conversation_history: history.clone(),
                        selected_file_id: None,
                    })
                    .await;
                spinner.finish_and_clear();

                match answer {
                    Ok(answer) => {
                        println!("\n{}\n", answer.response);
                        record_turn(&mut history, &answer);
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "chat turn failed");
                        println!("✗ {}\n", e);
                    }
                }
            }
        }

        Commands::Excel { path, query } => {
            println!("📊 minam - ファイル質問\n");

            let datasets = load_inputs(&[path], false)?;
            let dataset = datasets
                .first()
                .ok_or_else(|| error::MinamError::NoDataFiles("入力ファイルがありません".into()))?;

            let client = cli.ai_provider.build_client(&config)?;
            let agent = ExcelAgent::new(client, GenerationSettings::from(&config));

            let spinner = progress::spinner("AIが回答を作成中...");
            let answer = agent
                .ask(ExcelQuery {
                    query,
                    file_content: format_dataset_for_ai(dataset),
                    file_name: Some(dataset.file_name.clone()),
                })
                .await;
            spinner.finish_and_clear();

            println!("{}", answer?.response);
        }

        Commands::Validate { path } => {
            println!("🩺 minam - データ検証\n");

            let dataset = load_inputs(&[path], false)?
                .into_iter()
                .next()
                .ok_or_else(|| error::MinamError::NoDataFiles("入力ファイルがありません".into()))?;

            let client = cli.ai_provider.build_client(&config)?;
            let agent = FileAnalysisAgent::new(client, GenerationSettings::from(&config));

            let spinner = progress::spinner("AIがデータを検証中...");
            let report = agent.analyze(AnalyzeFileRequest::data_validation(dataset)).await;
            spinner.finish_and_clear();
            let report = report?;

            println!("形式: {}", report.file_type);
            println!("データ行数: {}", report.data_rows);
            println!("品質スコア: {}/100", report.quality_score);
            println!("欠損率: {}%", report.missing_values);
            println!("スキーマ生成: {}", if report.schema_generated { "成功" } else { "失敗" });
        }

        Commands::Serve { addr } => {
            let client = cli.ai_provider.build_client(&config)?;
            let state = server::AppState::new(client, GenerationSettings::from(&config));
            server::serve(addr, state).await?;
        }

        Commands::Config { set_api_key, set_model, show } => {
            let mut config = config;

            if let Some(key) = set_api_key {
                config.set_api_key(key)?;
                println!("✔ APIキーを設定しました");
            }

            if let Some(model) = set_model {
                config.set_model(model)?;
                println!("✔ モデルを設定しました");
            }

            if show {
                println!("設定:");
                println!("  モデル: {}", config.model);
                println!("  ベースURL: {}", config.base_url);
                println!("  最大トークン: {}", config.max_tokens);
                println!("  温度: {}", config.temperature);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  APIキー: {}", if config.api_key.is_some() { "設定済み" } else { "未設定" });
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "minam=debug,tower_http=debug" } else { "minam=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

/// 入力パスをスキャンしてデータセットを読み込む
fn load_inputs(paths: &[PathBuf], recursive: bool) -> error::Result<Vec<ParsedDataset>> {
    let files = scanner::scan_inputs(paths, recursive)?;
    if files.is_empty() {
        let joined = paths.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(", ");
        return Err(error::MinamError::NoDataFiles(joined));
    }

    println!("[1/2] {}件のファイルを読み込み中...", files.len());
    let bar = progress::file_bar(files.len());
    let datasets = loader::load_datasets_with(&files, |file| {
        bar.set_message(file.file_name.clone());
        bar.inc(1);
    });
    bar.finish_and_clear();
    let datasets = datasets?;

    for dataset in &datasets {
        println!(
            "  {} ({} rows × {} columns, {} sheets)",
            dataset.file_name,
            dataset.total_rows,
            dataset.total_columns,
            dataset.sheets.len()
        );
    }
    println!("✔ 読み込み完了\n");
    Ok(datasets)
}

/// ファイル名またはIDで注目ファイルを選択
fn select_file(datasets: &[ParsedDataset], key: &str) -> error::Result<String> {
    datasets
        .iter()
        .find(|d| d.id == key || d.file_name.eq_ignore_ascii_case(key))
        .map(|d| d.id.clone())
        .ok_or_else(|| error::MinamError::FileNotFound(key.to_string()))
}

fn print_connections_summary(count: usize) {
    if count > 0 {
        println!("[2/2] {}件の接続をAIに提示\n", count);
    } else {
        println!("[2/2] 接続なし\n");
    }
}
