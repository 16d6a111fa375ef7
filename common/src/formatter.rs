//! 表示・共有用テキスト整形
//!
//! 副作用なしの純粋関数のみ。

use crate::types::{OrderField, OrderRecord};

/// 手機・穿戴系キーワード（接頭辞 "42"）
const MOBILE_KEYWORDS: &[&str] = &["手機", "手錶", "ipod", "pods", "phone"];
const MOBILE_PREFIX: &str = "42";

/// 電腦・平板系キーワード（接頭辞 "45"）
const COMPUTER_KEYWORDS: &[&str] = &["電腦", "mac", "ipad"];
const COMPUTER_PREFIX: &str = "45";

/// 共有時のタイトル
pub const SHARE_TITLE: &str = "訂單資訊";

/// 共有テキスト先頭の見出し行
pub const SHARE_HEADING: &str = "📋 訂單資訊";

/// 品名から商品代碼の接頭辞を付与
///
/// 判定は大文字小文字を区別しない。両方に該当する場合は手機系を優先。
///
/// # Examples
/// ```
/// use order_ai_common::format_item_code;
///
/// assert_eq!(format_item_code("1234", "iPhone 手機殼"), "421234");
/// assert_eq!(format_item_code("1234", "MacBook Air"), "451234");
/// assert_eq!(format_item_code("1234", "充電線"), "1234");
/// assert_eq!(format_item_code("", "iPhone"), "");
/// ```
pub fn format_item_code(code: &str, name: &str) -> String {
    if code.is_empty() {
        return String::new();
    }
    format!("{}{}", item_code_prefix(name), code)
}

fn item_code_prefix(name: &str) -> &'static str {
    let lower = name.to_lowercase();
    if MOBILE_KEYWORDS.iter().any(|k| lower.contains(k)) {
        MOBILE_PREFIX
    } else if COMPUTER_KEYWORDS.iter().any(|k| lower.contains(k)) {
        COMPUTER_PREFIX
    } else {
        ""
    }
}

/// 番号付きの正規テキスト（コピー用）
///
/// 訂貨編號・發票號碼は値がある場合のみ出力する。番号は固定で振り直さない。
pub fn render_text(record: &OrderRecord) -> String {
    let formatted_code = format_item_code(&record.item_code, &record.item_name);

    let mut lines = vec![
        format!("1. 店別: {}", record.store),
        format!("2. 日期時間: {}", record.datetime),
        format!("3. itemcode: {}", formatted_code),
        format!("4. 品名: {}", record.item_name),
    ];
    if let Some(booking_no) = record.booking_no() {
        lines.push(format!("5. 訂貨編號: {}", booking_no));
    }
    if let Some(invoice_no) = record.invoice_no() {
        lines.push(format!("6. 發票號碼: {}", invoice_no));
    }

    lines.join("\n")
}

/// 共有用テキスト（見出し行 + 正規テキスト）
pub fn share_text(record: &OrderRecord) -> String {
    format!("{}\n{}", SHARE_HEADING, render_text(record))
}

/// 画面表示の1行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    pub field: OrderField,
    pub label: &'static str,
    pub value: String,
}

/// 画面表示用ラベル
pub fn display_label(field: OrderField) -> &'static str {
    match field {
        OrderField::Store => "1. 店別",
        OrderField::Datetime => "2. 時間",
        OrderField::ItemCode => "3. 代碼",
        OrderField::ItemName => "4. 品名",
        OrderField::BookingNo => "5. 訂編",
        OrderField::InvoiceNo => "6. 發票",
    }
}

/// 画面表示用の行リスト
///
/// 閲覧時は代碼を整形し、空の任意フィールドを省く。
/// 編集時は生の値を出し、任意フィールドも常に出す。
pub fn display_rows(record: &OrderRecord, editing: bool) -> Vec<DisplayRow> {
    OrderField::ALL
        .iter()
        .filter(|field| editing || !field.is_optional() || !record.get(**field).is_empty())
        .map(|&field| {
            let value = if field == OrderField::ItemCode && !editing {
                format_item_code(&record.item_code, &record.item_name)
            } else {
                record.get(field).to_string()
            };
            DisplayRow {
                field,
                label: display_label(field),
                value,
            }
        })
        .collect()
}
