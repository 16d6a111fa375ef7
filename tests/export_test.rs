//! 共有フォールバックの統合テスト
//!
//! クリップボード・共有・通知はすべて記録用のモック

use order_ai_common::{render_text, share_text, OrderRecord};
use order_ai_rust::error::{OrderAiError, Result};
use order_ai_rust::export::{
    ClipboardChannel, CopyOutcome, Exporter, NativeShare, Notifier, ShareData, ShareError,
    ShareOutcome, MANUAL_SHARE_NOTICE,
};
use order_ai_rust::source::SelectedImage;
use std::collections::VecDeque;
use std::path::PathBuf;

#[derive(Default)]
struct MemoryClipboard {
    texts: Vec<String>,
    fail: bool,
}

impl ClipboardChannel for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<()> {
        if self.fail {
            return Err(OrderAiError::Clipboard("permission denied".into()));
        }
        self.texts.push(text.to_string());
        Ok(())
    }
}

#[derive(Default)]
struct ScriptedShare {
    available: bool,
    responses: VecDeque<std::result::Result<(), ShareError>>,
    calls: Vec<ShareData>,
}

impl ScriptedShare {
    fn available(responses: Vec<std::result::Result<(), ShareError>>) -> Self {
        Self {
            available: true,
            responses: responses.into(),
            calls: Vec::new(),
        }
    }
}

impl NativeShare for ScriptedShare {
    fn is_available(&self) -> bool {
        self.available
    }

    fn share(&mut self, data: &ShareData) -> std::result::Result<(), ShareError> {
        self.calls.push(data.clone());
        self.responses.pop_front().unwrap_or(Ok(()))
    }
}

#[derive(Default)]
struct RecordingNotifier {
    messages: Vec<String>,
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }
}

fn sample_record() -> OrderRecord {
    OrderRecord {
        store: "台北店".into(),
        datetime: "2024-01-01 10:00".into(),
        item_code: "1234".into(),
        item_name: "iPhone 手機殼".into(),
        booking_no: Some("B-001".into()),
        ..Default::default()
    }
}

fn sample_image() -> SelectedImage {
    SelectedImage {
        path: PathBuf::from("/tmp/order.jpg"),
        file_name: "order.jpg".into(),
        media_type: Some("image/jpeg".into()),
        bytes: vec![0xFF, 0xD8, 0xFF],
    }
}

fn exporter(
    clipboard: MemoryClipboard,
    share: ScriptedShare,
) -> Exporter<MemoryClipboard, ScriptedShare, RecordingNotifier> {
    Exporter::new(clipboard, share, RecordingNotifier::default())
}

/// コピーは見出しなしの正規テキスト
#[test]
fn test_copy_text_writes_canonical_text() {
    let mut exporter = exporter(MemoryClipboard::default(), ScriptedShare::default());
    assert_eq!(exporter.copy_text(&sample_record()), CopyOutcome::Copied);

    let texts = &exporter.clipboard().texts;
    assert_eq!(texts.len(), 1);
    assert_eq!(texts[0], render_text(&sample_record()));
    assert!(texts[0].starts_with("1. 店別: 台北店"));
    assert!(exporter.notifier().messages.is_empty());
}

/// コピー失敗は静かに失敗
#[test]
fn test_copy_failure_is_silent() {
    let clipboard = MemoryClipboard { fail: true, ..Default::default() };
    let mut exporter = exporter(clipboard, ScriptedShare::default());
    assert_eq!(exporter.copy_text(&sample_record()), CopyOutcome::Failed);
    assert!(exporter.notifier().messages.is_empty());
}

/// 画像付き共有が成功
#[test]
fn test_share_with_image() {
    let mut exporter = exporter(MemoryClipboard::default(), ScriptedShare::available(vec![Ok(())]));
    let outcome = exporter.share(&sample_record(), &sample_image());

    assert_eq!(outcome, ShareOutcome::Shared);
    let calls = &exporter.share_target().calls;
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].title, "訂單資訊");
    assert_eq!(calls[0].text, share_text(&sample_record()));
    assert!(calls[0].text.starts_with("📋 訂單資訊\n"));
    assert_eq!(calls[0].files, vec![PathBuf::from("/tmp/order.jpg")]);
    assert!(exporter.clipboard().texts.is_empty());
}

/// ユーザーの取り消しではフォールバックしない
#[test]
fn test_share_cancelled_is_terminal() {
    let share = ScriptedShare::available(vec![Err(ShareError::Cancelled)]);
    let mut exporter = exporter(MemoryClipboard::default(), share);
    let outcome = exporter.share(&sample_record(), &sample_image());

    assert_eq!(outcome, ShareOutcome::Cancelled);
    assert_eq!(exporter.share_target().calls.len(), 1);
    assert!(exporter.clipboard().texts.is_empty());
    assert!(exporter.notifier().messages.is_empty());
}

/// 画像付きが失敗したらテキストのみで再試行
#[test]
fn test_share_retries_without_image() {
    let share = ScriptedShare::available(vec![Err(ShareError::Failed("files unsupported".into())), Ok(())]);
    let mut exporter = exporter(MemoryClipboard::default(), share);
    let outcome = exporter.share(&sample_record(), &sample_image());

    assert_eq!(outcome, ShareOutcome::SharedWithoutImage);
    let calls = &exporter.share_target().calls;
    assert_eq!(calls.len(), 2);
    assert!(calls[1].files.is_empty());
    assert_eq!(calls[1].title, calls[0].title);
    assert_eq!(calls[1].text, calls[0].text);
    assert!(exporter.clipboard().texts.is_empty());
    assert!(exporter.notifier().messages.is_empty());
}

/// 両方失敗したらコピー + 案内
#[test]
fn test_share_falls_back_to_clipboard() {
    let share = ScriptedShare::available(vec![
        Err(ShareError::Failed("first".into())),
        Err(ShareError::Failed("second".into())),
    ]);
    let mut exporter = exporter(MemoryClipboard::default(), share);
    let outcome = exporter.share(&sample_record(), &sample_image());

    assert_eq!(outcome, ShareOutcome::ManualFallback { copied: true });
    assert_eq!(exporter.clipboard().texts, vec![render_text(&sample_record())]);
    assert_eq!(exporter.notifier().messages, vec![MANUAL_SHARE_NOTICE.to_string()]);
}

/// テキストのみの再試行での取り消しはフォールバック扱い
#[test]
fn test_cancel_on_text_only_retry_falls_back() {
    let share = ScriptedShare::available(vec![
        Err(ShareError::Failed("first".into())),
        Err(ShareError::Cancelled),
    ]);
    let mut exporter = exporter(MemoryClipboard::default(), share);
    let outcome = exporter.share(&sample_record(), &sample_image());
    assert_eq!(outcome, ShareOutcome::ManualFallback { copied: true });
}

/// 共有機能がなければ即コピー + 案内1回
#[test]
fn test_share_unavailable() {
    let mut exporter = exporter(MemoryClipboard::default(), ScriptedShare::default());
    let outcome = exporter.share(&sample_record(), &sample_image());

    assert_eq!(outcome, ShareOutcome::ManualFallback { copied: true });
    assert!(exporter.share_target().calls.is_empty());
    assert_eq!(exporter.clipboard().texts.len(), 1);
    assert_eq!(exporter.notifier().messages.len(), 1);
    assert_eq!(exporter.notifier().messages[0], "已複製文字！請手動分享圖片到 LINE");
}

/// コピーにも失敗しても案内は出す
#[test]
fn test_share_unavailable_and_clipboard_denied() {
    let clipboard = MemoryClipboard { fail: true, ..Default::default() };
    let mut exporter = exporter(clipboard, ScriptedShare::default());
    let outcome = exporter.share(&sample_record(), &sample_image());

    assert_eq!(outcome, ShareOutcome::ManualFallback { copied: false });
    assert_eq!(exporter.notifier().messages.len(), 1);
}
