//! 解析APIレスポンスパーサー
//!
//! レスポンス形式: `{ "success": bool, "data"?: OrderRecord, "error"?: string }`
//!
//! 失敗はすべて `AnalysisError` 1種類に畳み込む:
//! - `success: false` → サービスのメッセージ（なければ「識別失敗」）
//! - JSONでない／形式不正 → 「識別過程發生錯誤」

use crate::error::AnalysisError;
use crate::types::OrderRecord;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct AnalyzeResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Option<OrderRecord>,
    #[serde(default)]
    error: Option<Value>,
}

/// 解析APIのレスポンス本文をパース
///
/// `data` のフィールドは検証しない（欠けた必須フィールドは空文字のまま通す）。
///
/// # Examples
/// ```
/// use order_ai_common::parse_analyze_response;
///
/// let body = r#"{"success": true, "data": {"store": "台北店", "itemCode": "1234"}}"#;
/// let record = parse_analyze_response(body).unwrap();
/// assert_eq!(record.store, "台北店");
///
/// let body = r#"{"success": false, "error": "圖片無法辨識"}"#;
/// assert_eq!(parse_analyze_response(body).unwrap_err().message, "圖片無法辨識");
/// ```
pub fn parse_analyze_response(body: &str) -> Result<OrderRecord, AnalysisError> {
    let response: AnalyzeResponse = serde_json::from_str(body).map_err(|e| {
        tracing::error!("解析レスポンスのパースに失敗: {}", e);
        AnalysisError::failed()
    })?;

    if !response.success {
        let message = response
            .error
            .as_ref()
            .and_then(Value::as_str)
            .map(str::to_string);
        tracing::warn!("解析サービスが失敗を返却: {:?}", message);
        return Err(AnalysisError::rejected(message));
    }

    response.data.ok_or_else(|| {
        tracing::error!("success=true だが data がありません");
        AnalysisError::failed()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_success() {
        let body = r#"{
            "success": true,
            "data": {
                "bookingNo": "B-1",
                "store": "台北店",
                "datetime": "2024-01-01 10:00",
                "itemCode": "1234",
                "itemName": "iPhone 手機殼"
            }
        }"#;

        let record = parse_analyze_response(body).unwrap();
        assert_eq!(record.booking_no.as_deref(), Some("B-1"));
        assert!(record.invoice_no.is_none());
        assert_eq!(record.item_name, "iPhone 手機殼");
    }

    #[test]
    fn test_parse_success_with_empty_required_fields() {
        let body = r#"{"success": true, "data": {"store": ""}}"#;
        let record = parse_analyze_response(body).unwrap();
        assert_eq!(record, OrderRecord::default());
    }

    #[test]
    fn test_parse_service_error_verbatim() {
        let body = r#"{"success": false, "error": "圖片太模糊，請重新拍攝"}"#;
        let err = parse_analyze_response(body).unwrap_err();
        assert_eq!(err.message, "圖片太模糊，請重新拍攝");
    }

    #[test]
    fn test_parse_service_error_without_message() {
        let err = parse_analyze_response(r#"{"success": false}"#).unwrap_err();
        assert_eq!(err.message, "識別失敗");

        let err = parse_analyze_response(r#"{"success": false, "error": ""}"#).unwrap_err();
        assert_eq!(err.message, "識別失敗");
    }

    #[test]
    fn test_parse_missing_success_flag_is_failure() {
        let err = parse_analyze_response(r#"{"data": {"store": "台北店"}}"#).unwrap_err();
        assert_eq!(err.message, "識別失敗");
    }

    #[test]
    fn test_parse_success_without_data() {
        let err = parse_analyze_response(r#"{"success": true}"#).unwrap_err();
        assert_eq!(err.message, "識別過程發生錯誤");
    }

    #[test]
    fn test_parse_non_json() {
        let err = parse_analyze_response("<html>502 Bad Gateway</html>").unwrap_err();
        assert_eq!(err.message, "識別過程發生錯誤");
    }

    #[test]
    fn test_parse_malformed_json() {
        let err = parse_analyze_response(r#"{"success": true, "data": {"#).unwrap_err();
        assert_eq!(err.message, "識別過程發生錯誤");
    }
}
