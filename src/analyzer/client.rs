//! 解析API連携モジュール
//!
//! `POST {base}/api/analyze-simple` に画像1枚を multipart (`image` フィールド) で送信し、
//! `{ success, data?, error? }` 形式のJSONを受け取る。

use super::Analyze;
use crate::error::Result;
use crate::source::SelectedImage;
use async_trait::async_trait;
use order_ai_common::{parse_analyze_response, AnalysisError, OrderRecord};
use reqwest::multipart::{Form, Part};

/// 解析エンドポイントのパス
pub const ANALYZE_PATH: &str = "/api/analyze-simple";

/// HTTP解析クライアント
///
/// ベースURLは構築時に注入する（環境変数は読まない）。
#[derive(Debug, Clone)]
pub struct HttpAnalysisClient {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpAnalysisClient {
    /// TLSバックエンドの初期化に失敗した場合はエラー
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            client,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), ANALYZE_PATH),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn post_image(&self, image: &SelectedImage) -> reqwest::Result<String> {
        let part = Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(image.media_type_or_default())?;
        let form = Form::new().part("image", part);

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await?;

        // ステータスに関係なく本文の success フラグで判定する
        tracing::debug!("解析API応答: {}", response.status());
        response.text().await
    }
}

#[async_trait]
impl Analyze for HttpAnalysisClient {
    async fn analyze(&self, image: &SelectedImage) -> std::result::Result<OrderRecord, AnalysisError> {
        tracing::info!(
            "解析リクエスト送信: {} ({} bytes) -> {}",
            image.file_name,
            image.bytes.len(),
            self.endpoint
        );

        let body = self.post_image(image).await.map_err(|e| {
            tracing::error!("解析API通信エラー: {}", e);
            AnalysisError::failed()
        })?;

        parse_analyze_response(&body)
    }
}
