// checkout_flow/examples/desktop_checkout.rs

use async_trait::async_trait;
use checkout_flow::{
  AttemptOutcome, BackendConfirmation, BackendError, CheckoutConfig, CheckoutSession, CheckoutState, Environment,
  GatewayScript, OrderReceipt, PaymentConfirmation, PaymentOrchestrator, Platform, Product, ScriptedGateway, Section,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

struct NeverCalled;

#[async_trait]
impl BackendConfirmation for NeverCalled {
  async fn confirm_payment(&self, _confirmation: &PaymentConfirmation) -> Result<OrderReceipt, BackendError> {
    Err(BackendError::Transport("backend should not be reached".into()))
  }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();
  info!("--- Desktop Checkout With Cancellation Example ---");

  let config = Arc::new(
    CheckoutConfig::for_environment(Environment::Development).with_gateway_timeout(Some(Duration::from_secs(5))),
  );
  let gateway = Arc::new(ScriptedGateway::new(GatewayScript::Hold));
  let orchestrator = PaymentOrchestrator::new(config, gateway.clone(), Arc::new(NeverCalled));

  let mut session = CheckoutSession::with_product(Product::new("prod-3", "Kettlebell 16kg", 59_000, "strength"));
  session.update_field(Section::Buyer, "email", "lifter@example.com")?;

  let platform = Platform::from_user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) Chrome/126.0");

  // The buyer presses "back" while the payment popup is still open.
  let (outcome, accepted) = tokio::join!(orchestrator.submit(&session, platform), async {
    while orchestrator.state() != CheckoutState::AwaitingGateway {
      tokio::time::sleep(Duration::from_millis(10)).await;
    }
    orchestrator.cancel()
  });
  info!(accepted, "Cancel requested.");

  if let AttemptOutcome::Cancelled { merchant_uid } = outcome? {
    info!(?merchant_uid, state = %orchestrator.state(), "Attempt cancelled.");
  }

  // The popup answers afterwards; the callback no longer reaches anything.
  let late = gateway.fire_held(json!({ "success": true, "imp_uid": "imp_late" }));
  info!(?late, "Late gateway callback.");
  Ok(())
}
