//! Order AI Common Library
//!
//! CLIと他のフロントエンドで共有される型・整形・状態機械

pub mod error;
pub mod formatter;
pub mod parser;
pub mod types;
pub mod workflow;

pub use error::{AnalysisError, Error, Result, WorkflowError};
pub use formatter::{
    display_label, display_rows, format_item_code, render_text, share_text, DisplayRow,
    SHARE_HEADING, SHARE_TITLE,
};
pub use parser::parse_analyze_response;
pub use types::{OrderField, OrderRecord};
pub use workflow::{AnalysisTicket, Completion, Phase, ViewMode, Workflow};
