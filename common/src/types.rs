//! 識別結果の型定義
//!
//! - OrderRecord: 1回の解析で得られる訂單情報（編集可能）
//! - OrderField: 編集対象フィールドの指定

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// 訂單の識別結果
///
/// 必須フィールドは解析サービスの値をそのまま保持する（空文字も許容）。
/// 任意フィールドは `None` と空文字を同じ「未設定」として扱う。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    #[serde(default, deserialize_with = "lenient_option", skip_serializing_if = "Option::is_none")]
    pub booking_no: Option<String>,     // 訂貨編號

    #[serde(default, deserialize_with = "lenient_option", skip_serializing_if = "Option::is_none")]
    pub invoice_no: Option<String>,     // 發票號碼

    #[serde(default, deserialize_with = "lenient_string")]
    pub store: String,                  // 店別

    #[serde(default, deserialize_with = "lenient_string")]
    pub datetime: String,               // 日期時間（自由形式）

    #[serde(default, deserialize_with = "lenient_string")]
    pub item_code: String,              // 商品代碼（接頭辞なし）

    #[serde(default, deserialize_with = "lenient_string")]
    pub item_name: String,              // 品名（複数行あり）
}

impl OrderRecord {
    /// フィールド値を取得（未設定の任意フィールドは空文字）
    pub fn get(&self, field: OrderField) -> &str {
        match field {
            OrderField::Store => &self.store,
            OrderField::Datetime => &self.datetime,
            OrderField::ItemCode => &self.item_code,
            OrderField::ItemName => &self.item_name,
            OrderField::BookingNo => self.booking_no.as_deref().unwrap_or(""),
            OrderField::InvoiceNo => self.invoice_no.as_deref().unwrap_or(""),
        }
    }

    /// フィールド値を上書き（検証なし）
    pub fn set(&mut self, field: OrderField, value: impl Into<String>) {
        let value = value.into();
        match field {
            OrderField::Store => self.store = value,
            OrderField::Datetime => self.datetime = value,
            OrderField::ItemCode => self.item_code = value,
            OrderField::ItemName => self.item_name = value,
            OrderField::BookingNo => self.booking_no = Some(value),
            OrderField::InvoiceNo => self.invoice_no = Some(value),
        }
    }

    /// 訂貨編號（空文字は未設定扱い）
    pub fn booking_no(&self) -> Option<&str> {
        non_empty(self.booking_no.as_deref())
    }

    /// 發票號碼（空文字は未設定扱い）
    pub fn invoice_no(&self) -> Option<&str> {
        non_empty(self.invoice_no.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// 編集対象フィールド
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderField {
    Store,
    Datetime,
    ItemCode,
    ItemName,
    BookingNo,
    InvoiceNo,
}

impl OrderField {
    /// 表示・編集順
    pub const ALL: [OrderField; 6] = [
        OrderField::Store,
        OrderField::Datetime,
        OrderField::ItemCode,
        OrderField::ItemName,
        OrderField::BookingNo,
        OrderField::InvoiceNo,
    ];

    /// JSONキー名
    pub fn key(&self) -> &'static str {
        match self {
            OrderField::Store => "store",
            OrderField::Datetime => "datetime",
            OrderField::ItemCode => "itemCode",
            OrderField::ItemName => "itemName",
            OrderField::BookingNo => "bookingNo",
            OrderField::InvoiceNo => "invoiceNo",
        }
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, OrderField::BookingNo | OrderField::InvoiceNo)
    }
}

impl std::str::FromStr for OrderField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "").as_str() {
            "store" => Ok(OrderField::Store),
            "datetime" => Ok(OrderField::Datetime),
            "itemcode" => Ok(OrderField::ItemCode),
            "itemname" => Ok(OrderField::ItemName),
            "bookingno" => Ok(OrderField::BookingNo),
            "invoiceno" => Ok(OrderField::InvoiceNo),
            _ => Err(format!(
                "Unknown field: {}. Use store, datetime, itemCode, itemName, bookingNo or invoiceNo",
                s
            )),
        }
    }
}

impl std::fmt::Display for OrderField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

// サービスの値は検証せずに受け取る: null は空、数値などは文字列化
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_option(deserializer)?.unwrap_or_default())
}

fn lenient_option<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}
