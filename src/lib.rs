//! 訂單画像のAI識別・編集・共有
//!
//! 画像選択 → 解析 → 修正 → 共有 の流れを CLI から扱う。
//! 純粋なロジック（整形・状態機械）は `order_ai_common` にある。

pub mod analyzer;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod interactive;
pub mod session;
pub mod source;
