//! プレビュー生成
//!
//! 選択画像ごとに縮小PNGを一時ディレクトリへ書き出す。
//! ハンドルの破棄（Drop）でファイルを削除するため、解放は所有者が1回だけ行う。

use super::SelectedImage;
use crate::error::{OrderAiError, Result};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// プレビューの最大辺（px）
const PREVIEW_MAX_SIZE: u32 = 480;

static NEXT_HANDLE_ID: AtomicU64 = AtomicU64::new(0);

/// 表示用プレビューへの参照
#[derive(Debug)]
pub struct PreviewHandle {
    path: PathBuf,
}

impl PreviewHandle {
    /// 画像からプレビューを作成
    ///
    /// デコードできない画像は元のバイト列をそのまま複製する。
    pub fn create(image: &SelectedImage, dir: &Path) -> Result<Self> {
        let digest = hex::encode(Sha256::digest(&image.bytes));
        let id = NEXT_HANDLE_ID.fetch_add(1, Ordering::Relaxed);
        let stem = format!(
            "order-ai-preview-{}-{}-{}",
            std::process::id(),
            id,
            &digest[..12]
        );

        let path = match image::load_from_memory(&image.bytes) {
            Ok(decoded) => {
                let path = dir.join(format!("{}.png", stem));
                decoded
                    .thumbnail(PREVIEW_MAX_SIZE, PREVIEW_MAX_SIZE)
                    .save(&path)
                    .map_err(|e| OrderAiError::ImageLoad(format!("プレビュー保存失敗: {}", e)))?;
                path
            }
            Err(e) => {
                tracing::debug!("プレビュー用デコード失敗、原本を複製: {}", e);
                let ext = image
                    .path
                    .extension()
                    .map(|ext| ext.to_string_lossy().to_string())
                    .unwrap_or_else(|| "bin".to_string());
                let path = dir.join(format!("{}.{}", stem, ext));
                std::fs::write(&path, &image.bytes)?;
                path
            }
        };

        tracing::debug!("プレビュー作成: {}", path.display());
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!("プレビュー解放: {}", self.path.display()),
            Err(e) => tracing::warn!("プレビュー削除失敗 {}: {}", self.path.display(), e),
        }
    }
}
