// checkout_flow/src/classifier.rs

//! Maps a normalized gateway callback to exactly one outcome.
//!
//! The SDK reuses codes across categories (`F400` covers both a user cancel and
//! a missing redirect URL), so the checks run in a fixed order and the first
//! match wins. `classify` is total: anything unrecognized is a transient failure.

use crate::gateway::GatewayPayload;
use crate::platform::Platform;
use serde::Serialize;

/// The SDK's generic failure code.
pub const GENERIC_FAILURE_CODE: &str = "F400";
/// Code the SDK uses when the buyer closes the payment window.
pub const GENERIC_CANCEL_CODE: &str = "PAY_PROCESS_CANCELED";

const CANCEL_MARKERS: &[&str] = &["취소", "1009", "cancel"];
const REDIRECT_MARKERS: &[&str] = &["리디렉션", "리다이렉트", "redirect", "m_redirect_url"];

const FALLBACK_MESSAGE: &str = "unknown gateway error";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum GatewayOutcome {
  Success { external_transaction_id: Option<String> },
  UserCancelled,
  RedirectConfigError { message: String },
  TransientFailure { code: Option<String>, message: String },
}

impl GatewayOutcome {
  pub fn is_success(&self) -> bool {
    matches!(self, GatewayOutcome::Success { .. })
  }
}

pub fn classify(payload: Option<&GatewayPayload>, platform: Platform) -> GatewayOutcome {
  let Some(payload) = payload else {
    // Mobile: the window was closed and the redirect came back empty.
    return GatewayOutcome::UserCancelled;
  };

  if payload.success {
    return GatewayOutcome::Success {
      external_transaction_id: payload.external_transaction_id.clone(),
    };
  }

  if platform.is_mobile() && payload.is_bare() {
    return GatewayOutcome::UserCancelled;
  }

  let code = payload.error_code.as_deref();
  let message = payload.error_message.as_deref().unwrap_or_default();

  if code == Some(GENERIC_FAILURE_CODE) && contains_any(message, CANCEL_MARKERS) {
    return GatewayOutcome::UserCancelled;
  }

  if code == Some(GENERIC_FAILURE_CODE) && contains_any(message, REDIRECT_MARKERS) {
    return GatewayOutcome::RedirectConfigError {
      message: message.to_string(),
    };
  }

  if code == Some(GENERIC_CANCEL_CODE) {
    return GatewayOutcome::UserCancelled;
  }

  GatewayOutcome::TransientFailure {
    code: payload.error_code.clone(),
    message: if message.is_empty() {
      FALLBACK_MESSAGE.to_string()
    } else {
      message.to_string()
    },
  }
}

fn contains_any(message: &str, markers: &[&str]) -> bool {
  let lowered = message.to_lowercase();
  markers.iter().any(|m| lowered.contains(m))
}
