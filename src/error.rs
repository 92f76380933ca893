use thiserror::Error;

#[derive(Error, Debug)]
pub enum MinamError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("APIキーが設定されていません。`minam config --set-api-key YOUR_KEY` で設定するか OPENAI_API_KEY を指定してください")]
    MissingApiKey,

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("未対応のファイル形式: {0}")]
    UnsupportedFormat(String),

    #[error("表計算ファイル読み込みエラー: {0}")]
    Spreadsheet(String),

    #[error("CSV読み込みエラー: {0}")]
    Csv(#[from] csv::Error),

    #[error("API呼び出しエラー: {0}")]
    ApiCall(String),

    #[error("APIレスポンスのパースに失敗: {0}")]
    ApiParse(String),

    #[error("{0}")]
    InvalidRequest(String),

    #[error("エクスポートエラー: {0}")]
    Export(String),

    #[error("データファイルが見つかりません: {0}")]
    NoDataFiles(String),

    #[error("CLI実行エラー: {0}")]
    CliExecution(String),

    #[error(transparent)]
    Common(#[from] minam_common::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MinamError>;
