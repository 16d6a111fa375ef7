//! 画像選択
//!
//! ファイル選択とドラッグ&ドロップの2経路。ドロップ時のみ
//! 宣言されたメディアタイプが `image/` でなければ無視する。

mod preview;

pub use preview::PreviewHandle;

use crate::error::{OrderAiError, Result};
use std::path::{Path, PathBuf};

/// 拡張子 → メディアタイプ
const IMAGE_MEDIA_TYPES: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("bmp", "image/bmp"),
    ("heic", "image/heic"),
    ("heif", "image/heif"),
];

const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

/// 選択経路
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectMethod {
    /// ファイル選択（種別はピッカー側で制限済み）
    Picked,
    /// ドラッグ&ドロップ
    Dropped,
}

/// 選択結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    Selected,
    /// 画像以外のドロップ（状態変更なし）
    Rejected,
}

/// 選択された画像
#[derive(Debug, Clone)]
pub struct SelectedImage {
    pub path: PathBuf,
    pub file_name: String,
    /// 宣言されたメディアタイプ
    pub media_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl SelectedImage {
    /// ファイルから読み込み
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(OrderAiError::FileNotFound(path.display().to_string()));
        }

        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        Ok(Self {
            path: path.to_path_buf(),
            file_name,
            media_type: media_type_for(path).map(str::to_string),
            bytes,
        })
    }

    pub fn media_type_or_default(&self) -> &str {
        self.media_type.as_deref().unwrap_or(FALLBACK_MEDIA_TYPE)
    }

    pub fn is_image(&self) -> bool {
        self.media_type
            .as_deref()
            .is_some_and(|t| t.starts_with("image/"))
    }
}

/// 拡張子からメディアタイプを推定
pub fn media_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_string_lossy().to_lowercase();
    IMAGE_MEDIA_TYPES
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, media_type)| *media_type)
}

/// 画像ソース
///
/// 選択中の画像は最大1枚。プレビューは画像と1対1で、置き換え・リセット時に解放する。
#[derive(Debug)]
pub struct ImageSource {
    image: Option<SelectedImage>,
    preview: Option<PreviewHandle>,
    /// 入力欄の値（リセットで空にして同じファイルを再選択可能にする）
    input_value: Option<PathBuf>,
    preview_dir: PathBuf,
}

impl Default for ImageSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageSource {
    pub fn new() -> Self {
        Self::with_preview_dir(std::env::temp_dir())
    }

    pub fn with_preview_dir(preview_dir: impl Into<PathBuf>) -> Self {
        Self {
            image: None,
            preview: None,
            input_value: None,
            preview_dir: preview_dir.into(),
        }
    }

    /// 画像を選択（既存の画像とプレビューは置き換え）
    pub fn select(&mut self, image: SelectedImage, method: SelectMethod) -> SelectOutcome {
        if method == SelectMethod::Dropped && !image.is_image() {
            tracing::debug!(
                "画像以外のドロップを無視: {} ({})",
                image.file_name,
                image.media_type_or_default()
            );
            return SelectOutcome::Rejected;
        }

        // 旧プレビューを先に解放
        self.preview = None;
        self.preview = match PreviewHandle::create(&image, &self.preview_dir) {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::warn!("プレビュー作成失敗: {}", e);
                None
            }
        };
        self.input_value = Some(image.path.clone());
        self.image = Some(image);
        SelectOutcome::Selected
    }

    /// 画像・プレビュー・入力欄をクリア
    pub fn reset(&mut self) {
        self.preview = None;
        self.image = None;
        self.input_value = None;
    }

    pub fn image(&self) -> Option<&SelectedImage> {
        self.image.as_ref()
    }

    pub fn preview(&self) -> Option<&PreviewHandle> {
        self.preview.as_ref()
    }

    pub fn input_value(&self) -> Option<&Path> {
        self.input_value.as_deref()
    }
}
