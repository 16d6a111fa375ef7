//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Workflow error: {0}")]
    Workflow(#[from] WorkflowError),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

/// 解析失敗
///
/// ユーザーに表示するメッセージのみを保持する。
/// サービスが返したメッセージはそのまま、なければ固定の文言。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct AnalysisError {
    pub message: String,
}

impl AnalysisError {
    /// サービスが `success: false` をメッセージなしで返した場合の文言
    pub const REJECTED: &'static str = "識別失敗";
    /// 通信・パース失敗時の文言
    pub const FAILED: &'static str = "識別過程發生錯誤";

    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }

    /// サービスの拒否応答（メッセージが空なら固定文言）
    pub fn rejected(message: Option<String>) -> Self {
        match message {
            Some(m) if !m.is_empty() => Self::new(m),
            _ => Self::new(Self::REJECTED),
        }
    }

    /// 通信・パース失敗
    pub fn failed() -> Self {
        Self::new(Self::FAILED)
    }
}

/// ワークフローの不正操作
///
/// 状態は変更されない。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("画像が選択されていません")]
    NoImage,

    #[error("識別中です")]
    AlreadyAnalyzing,

    #[error("識別結果がありません")]
    NoRecord,

    #[error("編集モードではありません")]
    NotEditing,
}
