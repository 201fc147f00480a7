// tests/common/mod.rs
#![allow(dead_code)]

use async_trait::async_trait;
use checkout_flow::{
  AddressLookupResult, BackendConfirmation, BackendError, CheckoutConfig, CheckoutSession, CheckoutState,
  Environment, GatewayScript, OrderReceipt, PaymentConfirmation, PaymentOrchestrator, Product, ScriptedGateway, Section,
};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tracing::Level;

// --- Tracing ---
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- Backend double ---

/// How `RecordingBackend` answers one confirmation.
#[derive(Debug, Clone)]
pub enum BackendReply {
  Accept,
  AuthExpired,
  Reject(u16),
}

/// Records every confirmation it receives and answers from a queue
/// (`Accept` once the queue is empty).
#[derive(Default)]
pub struct RecordingBackend {
  replies: Mutex<VecDeque<BackendReply>>,
  calls: Mutex<Vec<PaymentConfirmation>>,
}

impl RecordingBackend {
  pub fn replying(reply: BackendReply) -> Self {
    let backend = Self::default();
    backend.replies.lock().push_back(reply);
    backend
  }

  pub fn calls(&self) -> Vec<PaymentConfirmation> {
    self.calls.lock().clone()
  }

  pub fn call_count(&self) -> usize {
    self.calls.lock().len()
  }
}

#[async_trait]
impl BackendConfirmation for RecordingBackend {
  async fn confirm_payment(&self, confirmation: &PaymentConfirmation) -> Result<OrderReceipt, BackendError> {
    self.calls.lock().push(confirmation.clone());
    let reply = self.replies.lock().pop_front().unwrap_or(BackendReply::Accept);
    match reply {
      BackendReply::Accept => Ok(OrderReceipt {
        order_number: format!("ORD-{}", confirmation.merchant_uid.trim_start_matches("order_")),
        product_name: confirmation.product_name.clone(),
        total_amount: confirmation.amount,
      }),
      BackendReply::AuthExpired => Err(BackendError::AuthExpired),
      BackendReply::Reject(status) => Err(BackendError::Rejected {
        status,
        body: "internal error".to_string(),
      }),
    }
  }
}

// --- Fixtures ---

pub const YOGA_MAT_PRICE: u64 = 10_000;

pub fn yoga_mat() -> Product {
  Product::new("prod-1", "Yoga Mat", YOGA_MAT_PRICE, "yoga")
}

/// A session that passes every submission check.
pub fn ready_session() -> CheckoutSession {
  let mut session = CheckoutSession::with_product(yoga_mat());
  session.update_field(Section::Buyer, "name", "Kim Runner").unwrap();
  session.update_field(Section::Buyer, "email", "runner@example.com").unwrap();
  session.update_field(Section::Buyer, "phone", "010-1234-5678").unwrap();
  session.update_field(Section::Delivery, "recipient_name", "Kim Runner").unwrap();
  session.update_field(Section::Delivery, "message", "Leave at the door").unwrap();
  session
    .apply_address(
      Section::Delivery,
      &AddressLookupResult {
        zip_code: "06236".to_string(),
        address: "152 Teheran-ro, Gangnam-gu".to_string(),
        detail_address: String::new(),
      },
      false,
    )
    .unwrap();
  session.update_field(Section::Delivery, "detail_address", "Apt 1203").unwrap();
  session
}

pub fn dev_config() -> CheckoutConfig {
  CheckoutConfig::for_environment(Environment::Development)
}

pub fn success_payload() -> serde_json::Value {
  serde_json::json!({ "success": true, "imp_uid": "imp_448280090638" })
}

pub struct Harness {
  pub orchestrator: PaymentOrchestrator,
  pub gateway: Arc<ScriptedGateway>,
  pub backend: Arc<RecordingBackend>,
}

pub fn harness_with(config: CheckoutConfig, gateway: ScriptedGateway, backend: RecordingBackend) -> Harness {
  let gateway = Arc::new(gateway);
  let backend = Arc::new(backend);
  let orchestrator = PaymentOrchestrator::new(Arc::new(config), gateway.clone(), backend.clone());
  Harness {
    orchestrator,
    gateway,
    backend,
  }
}

pub fn harness(script: GatewayScript) -> Harness {
  harness_with(dev_config(), ScriptedGateway::new(script), RecordingBackend::default())
}

/// Polls until the orchestrator reaches `state`; panics after one second.
pub async fn wait_for_state(orchestrator: &PaymentOrchestrator, state: CheckoutState) {
  for _ in 0..200 {
    if orchestrator.state() == state {
      return;
    }
    tokio::time::sleep(Duration::from_millis(5)).await;
  }
  panic!("orchestrator never reached {state}, stuck in {}", orchestrator.state());
}
