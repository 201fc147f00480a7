// checkout_flow/examples/mobile_checkout.rs

use async_trait::async_trait;
use checkout_flow::{
  AddressLookupResult, AgreementFlag, AttemptOutcome, BackendConfirmation, BackendError, CheckoutConfig,
  CheckoutSession, GatewayScript, OrderReceipt, PaymentConfirmation, PaymentOrchestrator, Platform, Product,
  ScriptedGateway, Section,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

/// Accepts every confirmation and numbers orders sequentially.
struct InMemoryOrders {
  next: parking_lot::Mutex<u32>,
}

#[async_trait]
impl BackendConfirmation for InMemoryOrders {
  async fn confirm_payment(&self, confirmation: &PaymentConfirmation) -> Result<OrderReceipt, BackendError> {
    let mut next = self.next.lock();
    *next += 1;
    Ok(OrderReceipt {
      order_number: format!("ORD-{:04}", *next),
      product_name: confirmation.product_name.clone(),
      total_amount: confirmation.amount,
    })
  }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();
  info!("--- Mobile Checkout Example ---");

  let config = Arc::new(CheckoutConfig::from_env()?);
  info!(environment = %config.environment, merchant_id = %config.merchant_id, "Configuration loaded.");

  let mut session = CheckoutSession::with_product(Product::new("prod-17", "Foam Roller", 25_000, "recovery"));
  session.update_field(Section::Buyer, "name", "Kim Runner")?;
  session.update_field(Section::Buyer, "email", "runner@example.com")?;
  session.update_field(Section::Buyer, "phone", "010-1234-5678")?;
  session.update_field(Section::Delivery, "recipient_name", "Kim Runner")?;
  session.apply_address(
    Section::Delivery,
    &AddressLookupResult {
      zip_code: "06236".into(),
      address: "152 Teheran-ro, Gangnam-gu, Seoul".into(),
      detail_address: String::new(),
    },
    false,
  )?;
  session.update_field(Section::Delivery, "detail_address", "Apt 1203")?;
  session.set_available_deposit(3_000);
  let applied = session.apply_deposit(5_000);
  session.toggle_agreement(AgreementFlag::All);
  info!(applied, total = session.total_amount(), ready = session.is_ready_for_payment(), "Order entry complete.");

  let platform = Platform::from_user_agent("Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) Mobile/15E148");

  // First attempt: the buyer closes the payment window, the redirect comes back empty.
  let gateway = Arc::new(ScriptedGateway::new(GatewayScript::respond(json!({
    "success": true,
    "imp_uid": "imp_448280090638"
  }))));
  gateway.push_script(GatewayScript::respond(json!({})));

  let orchestrator = PaymentOrchestrator::new(
    config,
    gateway.clone(),
    Arc::new(InMemoryOrders {
      next: parking_lot::Mutex::new(0),
    }),
  );

  for attempt in 1..=2 {
    match orchestrator.submit(&session, platform).await? {
      AttemptOutcome::Completed(receipt) => {
        info!(attempt, order = %receipt.order_number, amount = receipt.total_amount, "Payment completed.");
      }
      AttemptOutcome::Cancelled { merchant_uid } => {
        info!(attempt, ?merchant_uid, "Buyer cancelled; the order page stays open.");
      }
      AttemptOutcome::Failed(err) => {
        warn!(attempt, error = %err, "{}", err.user_message());
      }
    }
  }

  for request in gateway.requests() {
    info!(
      merchant_uid = %request.merchant_uid,
      app_scheme = ?request.app_scheme,
      m_redirect_url = ?request.m_redirect_url,
      "Request sent to the gateway."
    );
  }
  Ok(())
}
