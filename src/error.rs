use thiserror::Error;

#[derive(Error, Debug)]
pub enum OrderAiError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("解析APIのURLが設定されていません。`ORDER_AI_API_URL` を設定するか `order-ai config --set-api-url URL` を実行してください")]
    MissingApiUrl,

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("画像読み込みエラー: {0}")]
    ImageLoad(String),

    #[error("HTTPクライアント初期化エラー: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("{0}")]
    Analysis(#[from] order_ai_common::AnalysisError),

    #[error("クリップボードエラー: {0}")]
    Clipboard(String),

    #[error("入力エラー: {0}")]
    Prompt(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] order_ai_common::Error),
}

impl From<order_ai_common::WorkflowError> for OrderAiError {
    fn from(e: order_ai_common::WorkflowError) -> Self {
        OrderAiError::Common(e.into())
    }
}

pub type Result<T> = std::result::Result<T, OrderAiError>;
