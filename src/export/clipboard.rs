use super::ClipboardChannel;
use crate::error::{OrderAiError, Result};

/// システムクリップボード（arboard）
///
/// 接続は初回書き込み時に開き、以後は保持する。
/// Linux では保持しているプロセスが終了すると内容が消える。
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// プロセス終了後も内容が残るか
    ///
    /// Linux (X11/Wayland) ではクリップボードマネージャーが引き取らない限り消える。
    pub fn keeps_contents_after_exit() -> bool {
        !cfg!(target_os = "linux")
    }
}

impl ClipboardChannel for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<()> {
        if self.inner.is_none() {
            let clipboard = arboard::Clipboard::new()
                .map_err(|e| OrderAiError::Clipboard(format!("クリップボードを開けません: {}", e)))?;
            self.inner = Some(clipboard);
        }

        let clipboard = self
            .inner
            .as_mut()
            .ok_or_else(|| OrderAiError::Clipboard("クリップボード未接続".into()))?;
        clipboard
            .set_text(text.to_string())
            .map_err(|e| OrderAiError::Clipboard(format!("書き込み失敗: {}", e)))
    }
}
