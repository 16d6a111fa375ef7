mod client;

pub use client::{HttpAnalysisClient, ANALYZE_PATH};

use crate::source::SelectedImage;
use async_trait::async_trait;
use order_ai_common::{AnalysisError, OrderRecord};

/// 画像解析サービス
///
/// 1回の呼び出しで1枚を送信する。リトライしない。
#[async_trait]
pub trait Analyze: Send + Sync {
    async fn analyze(&self, image: &SelectedImage) -> Result<OrderRecord, AnalysisError>;
}
