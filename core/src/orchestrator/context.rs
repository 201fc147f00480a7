// checkout_flow/src/orchestrator/context.rs

//! Data behind the attempt pipeline's `ContextData`.

use super::state::{AttemptOutcome, CheckoutState};
use crate::attempt::{MerchantUidGenerator, PaymentAttempt};
use crate::backend::BackendConfirmation;
use crate::classifier::GatewayOutcome;
use crate::config::CheckoutConfig;
use crate::gateway::{PaymentData, PaymentGateway};
use crate::models::{BuyerProfile, DeliveryInfo, Product};
use crate::platform::Platform;
use crate::session::CheckoutSession;
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Notify;

/// Everything an attempt talks to. Cheap to clone.
#[derive(Clone)]
pub(crate) struct Collaborators {
  pub config: Arc<CheckoutConfig>,
  pub gateway: Arc<dyn PaymentGateway>,
  pub backend: Arc<dyn BackendConfirmation>,
  pub uids: MerchantUidGenerator,
}

/// The orchestrator's FSM state plus the handle of the attempt in flight.
#[derive(Debug)]
pub(crate) struct AttemptSlot {
  pub state: CheckoutState,
  pub in_flight: Option<InFlight>,
}

#[derive(Debug)]
pub(crate) struct InFlight {
  pub merchant_uid: Option<String>,
  /// Set by `cancel`; checked before the gateway is opened.
  pub cancel_requested: bool,
  pub cancel: Arc<Notify>,
}

impl AttemptSlot {
  pub fn idle() -> Self {
    Self {
      state: CheckoutState::Idle,
      in_flight: None,
    }
  }
}

/// Session data read at submission time. The session itself is never touched.
#[derive(Debug, Clone)]
pub(crate) struct SubmissionSnapshot {
  pub product: Option<Product>,
  pub buyer: BuyerProfile,
  pub delivery: DeliveryInfo,
}

impl From<&CheckoutSession> for SubmissionSnapshot {
  fn from(session: &CheckoutSession) -> Self {
    Self {
      product: session.product().cloned(),
      buyer: session.buyer().clone(),
      delivery: session.delivery().clone(),
    }
  }
}

/// TData of the attempt pipeline.
pub(crate) struct AttemptCtxData {
  pub deps: Collaborators,
  pub slot: Arc<Mutex<AttemptSlot>>,
  pub cancel: Arc<Notify>,
  pub snapshot: SubmissionSnapshot,
  pub platform: Platform,
  pub attempt: Option<PaymentAttempt>,
  pub request: Option<PaymentData>,
  /// `None` when the gateway closed without a response.
  pub raw_payload: Option<Value>,
  pub classification: Option<GatewayOutcome>,
  pub outcome: Option<AttemptOutcome>,
}

impl AttemptCtxData {
  pub fn new(
    deps: Collaborators,
    slot: Arc<Mutex<AttemptSlot>>,
    cancel: Arc<Notify>,
    snapshot: SubmissionSnapshot,
    platform: Platform,
  ) -> Self {
    Self {
      deps,
      slot,
      cancel,
      snapshot,
      platform,
      attempt: None,
      request: None,
      raw_payload: None,
      classification: None,
      outcome: None,
    }
  }
}
