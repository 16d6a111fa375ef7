//! 外部コマンドによる共有
//!
//! 設定された共有コマンドに画像パスを引数で渡し、タイトルと本文は環境変数で渡す。
//! 終了コード 0 は成功、130 はユーザーの取り消し、それ以外は失敗。

use super::{NativeShare, ShareData, ShareError};
use std::path::Path;
use std::process::Command;

pub const SHARE_TITLE_ENV: &str = "ORDER_AI_SHARE_TITLE";
pub const SHARE_TEXT_ENV: &str = "ORDER_AI_SHARE_TEXT";

/// Ctrl-C 等での中断
const CANCELLED_EXIT_CODE: i32 = 130;

#[derive(Debug, Clone, Default)]
pub struct CommandShare {
    command: Option<Vec<String>>,
}

impl CommandShare {
    pub fn new(command: Option<Vec<String>>) -> Self {
        Self { command }
    }
}

impl NativeShare for CommandShare {
    fn is_available(&self) -> bool {
        self.command
            .as_ref()
            .and_then(|c| c.first())
            .is_some_and(|program| program_exists(program))
    }

    fn share(&mut self, data: &ShareData) -> Result<(), ShareError> {
        let (program, args) = self
            .command
            .as_ref()
            .and_then(|c| c.split_first())
            .ok_or(ShareError::Unavailable)?;

        tracing::debug!("共有コマンド実行: {} (添付 {}件)", program, data.files.len());
        let status = Command::new(program)
            .args(args)
            .args(&data.files)
            .env(SHARE_TITLE_ENV, &data.title)
            .env(SHARE_TEXT_ENV, &data.text)
            .status()
            .map_err(|e| ShareError::Failed(format!("共有コマンド実行エラー: {}", e)))?;

        match status.code() {
            Some(0) => Ok(()),
            Some(CANCELLED_EXIT_CODE) => Err(ShareError::Cancelled),
            code => Err(ShareError::Failed(format!("共有コマンド終了コード {:?}", code))),
        }
    }
}

fn program_exists(program: &str) -> bool {
    let path = Path::new(program);
    if path.components().count() > 1 {
        return path.is_file();
    }

    std::env::var_os("PATH")
        .map(|paths| {
            std::env::split_paths(&paths).any(|dir| {
                dir.join(program).is_file()
                    || (cfg!(windows) && dir.join(format!("{}.exe", program)).is_file())
            })
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(files: Vec<std::path::PathBuf>) -> ShareData {
        ShareData {
            title: "訂單資訊".into(),
            text: "📋 訂單資訊\n1. 店別: 台北店".into(),
            files,
        }
    }

    #[test]
    fn test_unconfigured_is_unavailable() {
        let mut share = CommandShare::new(None);
        assert!(!share.is_available());
        assert_eq!(share.share(&data(vec![])), Err(ShareError::Unavailable));
    }

    #[test]
    fn test_missing_program_is_unavailable() {
        let share = CommandShare::new(Some(vec!["order-ai-no-such-share-tool".into()]));
        assert!(!share.is_available());
    }

    #[cfg(unix)]
    #[test]
    fn test_exit_codes() {
        let sh = |script: &str| {
            CommandShare::new(Some(vec!["sh".into(), "-c".into(), script.into(), "share".into()]))
        };

        let mut ok = sh("exit 0");
        assert!(ok.is_available());
        assert_eq!(ok.share(&data(vec![])), Ok(()));

        assert_eq!(sh("exit 130").share(&data(vec![])), Err(ShareError::Cancelled));
        assert!(matches!(sh("exit 1").share(&data(vec![])), Err(ShareError::Failed(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_passes_title_text_and_files() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.txt");
        let script = format!(
            "printf '%s|%s|%s' \"$ORDER_AI_SHARE_TITLE\" \"$ORDER_AI_SHARE_TEXT\" \"$1\" > '{}'",
            out.display()
        );
        let mut share = CommandShare::new(Some(vec!["sh".into(), "-c".into(), script, "share".into()]));

        share.share(&data(vec!["/tmp/order.jpg".into()])).unwrap();
        let written = std::fs::read_to_string(&out).unwrap();
        assert_eq!(written, "訂單資訊|📋 訂單資訊\n1. 店別: 台北店|/tmp/order.jpg");
    }
}
