// checkout_flow/src/gateway/mod.rs

//! The boundary to the external payment SDK.
//!
//! The SDK exposes `init(merchant_id)` and `request_pay(data, callback)`. The
//! callback fires once, some time later, with a loosely structured JSON object.
//! `PaymentGateway` mirrors that shape; `GatewayCallback` turns the single
//! invocation into a channel the orchestrator can await, and makes every later
//! invocation a no-op.

pub mod mock;
pub mod payload;
pub mod request;

pub use mock::{GatewayScript, ScriptedGateway};
pub use payload::GatewayPayload;
pub use request::PaymentData;

use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::oneshot;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
  #[error("payment SDK is not loaded")]
  NotLoaded,

  #[error("payment SDK rejected the request: {0}")]
  Rejected(String),
}

/// The payment SDK handle.
pub trait PaymentGateway: Send + Sync {
  /// Whether the SDK script is loaded and usable.
  fn is_loaded(&self) -> bool;

  fn init(&self, merchant_id: &str) -> Result<(), GatewayError>;

  /// Opens the payment window. Returns as soon as the request is handed over;
  /// the outcome arrives later through `callback`.
  fn request_pay(&self, data: PaymentData, callback: GatewayCallback) -> Result<(), GatewayError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackDelivery {
  Delivered,
  /// Duplicate invocation, or the attempt was already cancelled or timed out.
  Stale,
}

/// Single-shot callback bound to one attempt's merchant order id.
#[derive(Debug, Clone)]
pub struct GatewayCallback {
  merchant_uid: Arc<str>,
  sender: Arc<Mutex<Option<oneshot::Sender<Value>>>>,
}

impl GatewayCallback {
  pub(crate) fn channel(merchant_uid: &str) -> (Self, oneshot::Receiver<Value>) {
    let (tx, rx) = oneshot::channel();
    let callback = Self {
      merchant_uid: Arc::from(merchant_uid),
      sender: Arc::new(Mutex::new(Some(tx))),
    };
    (callback, rx)
  }

  pub fn merchant_uid(&self) -> &str {
    &self.merchant_uid
  }

  /// Hands the raw SDK response to the waiting attempt.
  pub fn invoke(&self, payload: Value) -> CallbackDelivery {
    let Some(tx) = self.sender.lock().take() else {
      warn!(merchant_uid = %self.merchant_uid, "Duplicate gateway callback ignored.");
      return CallbackDelivery::Stale;
    };
    match tx.send(payload) {
      Ok(()) => CallbackDelivery::Delivered,
      Err(_) => {
        warn!(merchant_uid = %self.merchant_uid, "Late gateway callback for an abandoned attempt ignored.");
        CallbackDelivery::Stale
      }
    }
  }
}
