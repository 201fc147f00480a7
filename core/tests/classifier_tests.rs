// tests/classifier_tests.rs
mod common;

use checkout_flow::{classify, GatewayOutcome, GatewayPayload, Platform};
use common::setup_tracing;
use serde_json::{json, Value};

fn outcome_of(raw: Value, platform: Platform) -> GatewayOutcome {
  let payload = GatewayPayload::normalize(&raw);
  classify(payload.as_ref(), platform)
}

#[test]
fn raw_sdk_callbacks_classify_as_expected() {
  setup_tracing();
  let cases = [
    (json!({ "success": true, "imp_uid": "imp_1", "merchant_uid": "order_1" }), Platform::Desktop, "success"),
    (json!({ "imp_success": "true", "impUid": "imp_1" }), Platform::Mobile, "success"),
    (json!(null), Platform::Mobile, "cancel"),
    (json!({}), Platform::Desktop, "cancel"),
    (json!({ "imp_success": "false" }), Platform::Mobile, "cancel"),
    (json!({ "imp_success": "false" }), Platform::Desktop, "transient"),
    (
      json!({ "success": false, "error_code": "F400", "error_msg": "[1009] 결제를 취소하였습니다" }),
      Platform::Desktop,
      "cancel",
    ),
    (
      json!({ "imp_success": "false", "errorCode": "F400", "errorMessage": "리다이렉트 URL이 없습니다" }),
      Platform::Mobile,
      "redirect",
    ),
    (
      json!({ "success": false, "code": "PAY_PROCESS_CANCELED", "message": "PG window closed" }),
      Platform::Desktop,
      "cancel",
    ),
    (
      json!({ "success": false, "error_code": "F500", "error_msg": "카드 한도 초과" }),
      Platform::Mobile,
      "transient",
    ),
  ];

  for (raw, platform, expected) in cases {
    let outcome = outcome_of(raw.clone(), platform);
    let kind = match outcome {
      GatewayOutcome::Success { .. } => "success",
      GatewayOutcome::UserCancelled => "cancel",
      GatewayOutcome::RedirectConfigError { .. } => "redirect",
      GatewayOutcome::TransientFailure { .. } => "transient",
    };
    assert_eq!(kind, expected, "{raw} on {platform}");
  }
}

#[test]
fn success_carries_the_transaction_id() {
  let outcome = outcome_of(json!({ "success": true, "imp_uid": "imp_448280090638" }), Platform::Desktop);
  assert_eq!(
    outcome,
    GatewayOutcome::Success {
      external_transaction_id: Some("imp_448280090638".into())
    }
  );
  assert!(outcome.is_success());
}

#[test]
fn outcomes_serialize_with_a_tag() {
  let outcome = outcome_of(
    json!({ "success": false, "error_code": "F400", "error_msg": "m_redirect_url missing" }),
    Platform::Mobile,
  );
  assert_eq!(
    serde_json::to_value(&outcome).unwrap(),
    json!({ "outcome": "redirect_config_error", "message": "m_redirect_url missing" })
  );
}
