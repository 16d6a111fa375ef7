//! 識別結果のエクスポート
//!
//! 共有は次の順で試行し、成功した時点で終了する:
//! 1. ネイティブ共有（画像付き）
//! 2. ネイティブ共有（テキストのみ）
//! 3. クリップボードへコピー + 手動共有の案内
//!
//! 1 でユーザーが取り消した場合はそこで終了する。

pub mod clipboard;
pub mod share;

pub use clipboard::SystemClipboard;
pub use share::CommandShare;

use crate::error::Result;
use crate::source::SelectedImage;
use order_ai_common::{render_text, share_text, OrderRecord, SHARE_TITLE};
use std::path::PathBuf;
use thiserror::Error;

/// 手動共有の案内
pub const MANUAL_SHARE_NOTICE: &str = "已複製文字！請手動分享圖片到 LINE";

/// 単発実行でコピーした内容が終了後に消える環境での注意
pub const TRANSIENT_CLIPBOARD_NOTICE: &str =
    "剪貼簿內容可能在程式結束後消失，請改用 `order-ai session` 或啟用剪貼簿管理程式";

/// クリップボード
pub trait ClipboardChannel {
    fn write_text(&mut self, text: &str) -> Result<()>;
}

/// ネイティブ共有
///
/// `is_available` は呼び出しのたびに確認する。
pub trait NativeShare {
    fn is_available(&self) -> bool;
    fn share(&mut self, data: &ShareData) -> std::result::Result<(), ShareError>;
}

/// ユーザーへの通知
pub trait Notifier {
    fn notify(&mut self, message: &str);
}

/// 共有内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareData {
    pub title: String,
    pub text: String,
    pub files: Vec<PathBuf>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShareError {
    #[error("ユーザーが共有を取り消しました")]
    Cancelled,

    #[error("共有機能が利用できません")]
    Unavailable,

    #[error("共有に失敗: {0}")]
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied,
    Failed,
}

/// 共有の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareOutcome {
    Shared,
    SharedWithoutImage,
    Cancelled,
    /// クリップボードへ退避して手動共有を案内
    ManualFallback { copied: bool },
}

/// 標準出力への通知
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&mut self, message: &str) {
        println!("📢 {}", message);
    }
}

/// エクスポーター
pub struct Exporter<C, S, N> {
    clipboard: C,
    share: S,
    notifier: N,
}

impl<C, S, N> Exporter<C, S, N>
where
    C: ClipboardChannel,
    S: NativeShare,
    N: Notifier,
{
    pub fn new(clipboard: C, share: S, notifier: N) -> Self {
        Self {
            clipboard,
            share,
            notifier,
        }
    }

    /// 正規テキストをクリップボードへ（失敗はログのみ）
    pub fn copy_text(&mut self, record: &OrderRecord) -> CopyOutcome {
        match self.clipboard.write_text(&render_text(record)) {
            Ok(()) => CopyOutcome::Copied,
            Err(e) => {
                tracing::warn!("コピー失敗: {}", e);
                CopyOutcome::Failed
            }
        }
    }

    /// 共有（フォールバック付き）
    pub fn share(&mut self, record: &OrderRecord, image: &SelectedImage) -> ShareOutcome {
        if !self.share.is_available() {
            tracing::debug!("ネイティブ共有なし、クリップボードへ退避");
            return self.manual_fallback(record);
        }

        let with_image = ShareData {
            title: SHARE_TITLE.to_string(),
            text: share_text(record),
            files: vec![image.path.clone()],
        };
        match self.share.share(&with_image) {
            Ok(()) => return ShareOutcome::Shared,
            Err(ShareError::Cancelled) => {
                tracing::info!("共有がユーザーにより取り消されました");
                return ShareOutcome::Cancelled;
            }
            Err(e) => tracing::warn!("画像付き共有に失敗、テキストのみで再試行: {}", e),
        }

        let text_only = ShareData {
            files: Vec::new(),
            ..with_image
        };
        match self.share.share(&text_only) {
            Ok(()) => ShareOutcome::SharedWithoutImage,
            Err(e) => {
                tracing::warn!("テキスト共有にも失敗: {}", e);
                self.manual_fallback(record)
            }
        }
    }

    fn manual_fallback(&mut self, record: &OrderRecord) -> ShareOutcome {
        let copied = self.copy_text(record) == CopyOutcome::Copied;
        self.notifier.notify(MANUAL_SHARE_NOTICE);
        ShareOutcome::ManualFallback { copied }
    }

    pub fn clipboard(&self) -> &C {
        &self.clipboard
    }

    pub fn share_target(&self) -> &S {
        &self.share
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }
}
