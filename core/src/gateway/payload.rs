// checkout_flow/src/gateway/payload.rs

//! Normalization of the SDK's callback object.
//!
//! Field names differ between SDK versions and between the popup (desktop) and
//! redirect (mobile) flows, so every canonical field is read from a list of
//! known spellings.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const SUCCESS_KEYS: &[&str] = &["success", "imp_success"];
const ERROR_CODE_KEYS: &[&str] = &["error_code", "errorCode", "code"];
const ERROR_MESSAGE_KEYS: &[&str] = &["error_msg", "errorMessage", "error_message", "message"];
const TRANSACTION_ID_KEYS: &[&str] = &["imp_uid", "impUid", "txId"];
const MERCHANT_UID_KEYS: &[&str] = &["merchant_uid", "merchantUid"];

/// Canonical shape of a gateway callback.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayPayload {
  pub success: bool,
  pub error_code: Option<String>,
  pub error_message: Option<String>,
  pub external_transaction_id: Option<String>,
  pub merchant_uid: Option<String>,
}

impl GatewayPayload {
  /// Returns `None` for an empty response: `null`, a non-object, or an object
  /// carrying none of the recognized fields.
  pub fn normalize(raw: &Value) -> Option<Self> {
    let obj = raw.as_object()?;

    let success = first_bool(obj, SUCCESS_KEYS);
    let payload = GatewayPayload {
      success: success.unwrap_or(false),
      error_code: first_string(obj, ERROR_CODE_KEYS),
      error_message: first_string(obj, ERROR_MESSAGE_KEYS),
      external_transaction_id: first_string(obj, TRANSACTION_ID_KEYS),
      merchant_uid: first_string(obj, MERCHANT_UID_KEYS),
    };

    if success.is_none() && payload.is_bare() {
      return None;
    }
    Some(payload)
  }

  /// No code, message or ids: the SDK said nothing beyond the success flag.
  pub fn is_bare(&self) -> bool {
    self.error_code.is_none()
      && self.error_message.is_none()
      && self.external_transaction_id.is_none()
      && self.merchant_uid.is_none()
  }
}

fn first_bool(obj: &Map<String, Value>, keys: &[&str]) -> Option<bool> {
  keys.iter().find_map(|key| match obj.get(*key)? {
    Value::Bool(b) => Some(*b),
    Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
      "true" => Some(true),
      "false" => Some(false),
      _ => None,
    },
    _ => None,
  })
}

fn first_string(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
  keys.iter().find_map(|key| match obj.get(*key)? {
    Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
    Value::Number(n) => Some(n.to_string()),
    _ => None,
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn empty_shapes_normalize_to_none() {
    assert_eq!(GatewayPayload::normalize(&Value::Null), None);
    assert_eq!(GatewayPayload::normalize(&json!({})), None);
    assert_eq!(GatewayPayload::normalize(&json!("closed")), None);
    assert_eq!(GatewayPayload::normalize(&json!({"foo": 1, "error_code": null})), None);
  }

  #[test]
  fn reads_known_synonyms() {
    let desktop = GatewayPayload::normalize(&json!({
      "success": false,
      "error_code": "F400",
      "error_msg": "사용자 취소(1009)",
      "imp_uid": "imp_123",
      "merchant_uid": "order_1"
    }))
    .unwrap();
    let mobile = GatewayPayload::normalize(&json!({
      "imp_success": "false",
      "errorCode": "F400",
      "errorMessage": "사용자 취소(1009)",
      "impUid": "imp_123",
      "merchantUid": "order_1"
    }))
    .unwrap();
    assert_eq!(desktop, mobile);
    assert_eq!(desktop.error_code.as_deref(), Some("F400"));
  }

  #[test]
  fn blank_strings_count_as_absent_and_numbers_are_stringified() {
    let p = GatewayPayload::normalize(&json!({"success": "true", "error_msg": "  ", "code": 1009})).unwrap();
    assert!(p.success);
    assert_eq!(p.error_message, None);
    assert_eq!(p.error_code.as_deref(), Some("1009"));
  }

  #[test]
  fn explicit_false_without_details_is_bare_but_present() {
    let p = GatewayPayload::normalize(&json!({"success": false})).unwrap();
    assert!(!p.success);
    assert!(p.is_bare());
  }
}
