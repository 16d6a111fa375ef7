use clap::{Parser, Subcommand};
use order_ai_common::OrderField;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "order-ai")]
#[command(about = "訂單圖片AI識別・編輯・分享ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 訂單画像を識別して結果を表示
    Analyze {
        /// 訂單画像のパス
        #[arg(required = true)]
        image: PathBuf,

        /// ドラッグ&ドロップとして扱う（画像以外は無視）
        #[arg(long)]
        dropped: bool,

        /// 識別後にフィールドを修正（例: --set store=台北店）
        #[arg(short, long = "set", value_name = "FIELD=VALUE")]
        set: Vec<FieldEdit>,

        /// 結果テキストをクリップボードへコピー
        #[arg(long)]
        copy: bool,

        /// 結果を共有（共有できなければコピー）
        #[arg(long)]
        share: bool,

        /// 識別結果JSONの出力先
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 対話的に識別・修改・分享
    Session {
        /// 最初に選択する画像
        image: Option<PathBuf>,
    },

    /// 識別結果JSONから共有テキストを生成
    Render {
        /// 識別結果JSONファイル
        #[arg(required = true)]
        input: PathBuf,

        /// 見出し行付きの共有用テキストで出力
        #[arg(long)]
        share_text: bool,
    },

    /// 設定を表示/編集
    Config {
        /// 解析APIのベースURLを設定
        #[arg(long)]
        set_api_url: Option<String>,

        /// 共有コマンドを設定（プログラムと引数を個別に指定、最後に置く）
        ///
        /// 例: --set-share-command "/opt/My Share/bin/share" --notify
        #[arg(
            long,
            num_args = 1..,
            allow_hyphen_values = true,
            value_name = "ARG",
            conflicts_with = "clear_share_command"
        )]
        set_share_command: Option<Vec<String>>,

        /// 共有コマンドを解除（クリップボードへのコピーに戻す）
        #[arg(long)]
        clear_share_command: bool,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

/// `FIELD=VALUE` 形式のフィールド修正
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldEdit {
    pub field: OrderField,
    pub value: String,
}

impl std::str::FromStr for FieldEdit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, value) = s
            .split_once('=')
            .ok_or_else(|| format!("Invalid edit: {}. Use FIELD=VALUE", s))?;
        Ok(FieldEdit {
            field: field.trim().parse()?,
            value: value.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_edit_from_str() {
        let edit: FieldEdit = "store=台北店".parse().unwrap();
        assert_eq!(edit.field, OrderField::Store);
        assert_eq!(edit.value, "台北店");
    }

    #[test]
    fn test_field_edit_value_may_contain_equals_or_be_empty() {
        let edit: FieldEdit = "itemName=A=B".parse().unwrap();
        assert_eq!(edit.value, "A=B");

        let edit: FieldEdit = "bookingNo=".parse().unwrap();
        assert_eq!(edit.field, OrderField::BookingNo);
        assert_eq!(edit.value, "");
    }

    #[test]
    fn test_field_edit_invalid() {
        assert!("store".parse::<FieldEdit>().is_err());
        assert!("price=100".parse::<FieldEdit>().is_err());
    }

    #[test]
    fn test_cli_parses_analyze() {
        let cli = Cli::try_parse_from([
            "order-ai", "analyze", "order.jpg", "--dropped", "--set", "store=台中店", "--share",
        ])
        .unwrap();
        match cli.command {
            Commands::Analyze { image, dropped, set, share, copy, .. } => {
                assert_eq!(image, PathBuf::from("order.jpg"));
                assert!(dropped);
                assert!(share);
                assert!(!copy);
                assert_eq!(set.len(), 1);
            }
            _ => panic!("Expected Analyze"),
        }
    }

    #[test]
    fn test_cli_share_command_argv() {
        let cli = Cli::try_parse_from([
            "order-ai",
            "config",
            "--show",
            "--set-share-command",
            "/opt/My Share/bin/share",
            "--title",
            "訂單資訊",
        ])
        .unwrap();
        match cli.command {
            Commands::Config { set_share_command, clear_share_command, show, .. } => {
                assert!(show);
                assert!(!clear_share_command);
                assert_eq!(
                    set_share_command,
                    Some(vec![
                        "/opt/My Share/bin/share".to_string(),
                        "--title".to_string(),
                        "訂單資訊".to_string(),
                    ])
                );
            }
            _ => panic!("Expected Config"),
        }
    }

    #[test]
    fn test_cli_clear_share_command_conflicts() {
        assert!(Cli::try_parse_from([
            "order-ai",
            "config",
            "--clear-share-command",
            "--set-share-command",
            "share",
        ])
        .is_err());
    }
}
