// checkout_flow/src/orchestrator/steps.rs

//! The attempt pipeline: one step per phase of a submission.
//!
//! Each step either continues or records the attempt's outcome in the context
//! and stops the pipeline. A `before` hook on every step moves the
//! orchestrator's FSM state.

use super::context::{AttemptCtxData, SubmissionSnapshot};
use super::state::{AttemptOutcome, CheckoutState};
use crate::attempt::{BuyerSnapshot, PaymentAttempt};
use crate::backend::{BackendError, PaymentConfirmation};
use crate::classifier::{classify, GatewayOutcome};
use crate::config::CheckoutConfig;
use crate::core::{ContextData, PipelineControl};
use crate::error::{CheckoutError, ValidationError};
use crate::gateway::{GatewayCallback, GatewayError, GatewayPayload, PaymentData};
use crate::models::{PLACEHOLDER_BUYER_NAME, PLACEHOLDER_BUYER_PHONE};
use crate::pipeline::Pipeline;
use crate::platform::Platform;
use chrono::Utc;
use serde_json::Value;
use std::time::Duration;
use tokio::sync::{oneshot, Notify};
use tracing::{debug, info, warn};

pub(crate) const STEP_VALIDATE: &str = "validate_submission";
pub(crate) const STEP_PREPARE: &str = "prepare_attempt";
pub(crate) const STEP_AWAIT_GATEWAY: &str = "await_gateway";
pub(crate) const STEP_CLASSIFY: &str = "classify_response";
pub(crate) const STEP_CONFIRM: &str = "confirm_with_backend";

type Ctx = ContextData<AttemptCtxData>;

pub(crate) fn build_attempt_pipeline() -> Pipeline<AttemptCtxData, CheckoutError> {
  let mut pipeline = Pipeline::new(&[
    (STEP_VALIDATE, false),
    (STEP_PREPARE, false),
    (STEP_AWAIT_GATEWAY, false),
    (STEP_CLASSIFY, false),
    (STEP_CONFIRM, false),
  ]);

  for (step, state) in [
    (STEP_VALIDATE, CheckoutState::Validating),
    (STEP_AWAIT_GATEWAY, CheckoutState::AwaitingGateway),
    (STEP_CLASSIFY, CheckoutState::Classifying),
    (STEP_CONFIRM, CheckoutState::ConfirmingBackend),
  ] {
    pipeline.before_root(step, move |ctx: Ctx| async move {
      enter_state(&ctx, state);
      Ok::<_, CheckoutError>(PipelineControl::Continue)
    });
  }

  pipeline.on_root(STEP_VALIDATE, validate_submission);
  pipeline.on_root(STEP_PREPARE, prepare_attempt);
  pipeline.on_root(STEP_AWAIT_GATEWAY, await_gateway);
  pipeline.on_root(STEP_CLASSIFY, classify_response);
  pipeline.on_root(STEP_CONFIRM, confirm_with_backend);
  pipeline
}

fn enter_state(ctx: &Ctx, state: CheckoutState) {
  let slot = ctx.read().slot.clone();
  let mut slot = slot.lock();
  debug!(from = %slot.state, to = %state, "Checkout state transition.");
  slot.state = state;
}

fn finish(ctx: &Ctx, outcome: AttemptOutcome) -> PipelineControl {
  ctx.write().outcome = Some(outcome);
  PipelineControl::Stop
}

fn current_merchant_uid(ctx: &Ctx) -> Option<String> {
  let attempt = ctx.map_read(|data| &data.attempt);
  Option::as_ref(&*attempt).map(|attempt| attempt.merchant_uid.clone())
}

fn cancel_requested(ctx: &Ctx) -> bool {
  let slot = ctx.read().slot.clone();
  let requested = slot.lock().in_flight.as_ref().is_some_and(|in_flight| in_flight.cancel_requested);
  requested
}

/// First failing check wins.
fn check_submission(snapshot: &SubmissionSnapshot, config: &CheckoutConfig, gateway_loaded: bool) -> Option<CheckoutError> {
  let Some(product) = snapshot.product.as_ref() else {
    return Some(ValidationError::NoProduct.into());
  };
  if product.price == 0 {
    return Some(ValidationError::InvalidPrice.into());
  }
  if !snapshot.buyer.has_email() {
    return Some(ValidationError::MissingEmail.into());
  }
  if !gateway_loaded {
    return Some(CheckoutError::GatewayUnavailable);
  }
  if config.merchant_id.trim().is_empty() {
    return Some(CheckoutError::Config("merchant id is not configured".to_string()));
  }
  None
}

async fn validate_submission(ctx: Ctx) -> Result<PipelineControl, CheckoutError> {
  let failure = {
    let guard = ctx.read();
    check_submission(&guard.snapshot, &guard.deps.config, guard.deps.gateway.is_loaded())
  };
  match failure {
    Some(err) => {
      warn!(error = %err, "Submission rejected before opening the gateway.");
      Ok(finish(&ctx, AttemptOutcome::Failed(err)))
    }
    None => Ok(PipelineControl::Continue),
  }
}

fn or_placeholder(value: &str, placeholder: &str) -> String {
  if value.trim().is_empty() {
    placeholder.to_string()
  } else {
    value.to_string()
  }
}

fn build_attempt(
  snapshot: &SubmissionSnapshot,
  config: &CheckoutConfig,
  platform: Platform,
  merchant_uid: String,
) -> Result<PaymentAttempt, ValidationError> {
  let product = snapshot.product.as_ref().ok_or(ValidationError::NoProduct)?;
  let buyer = &snapshot.buyer;
  let delivery = &snapshot.delivery;
  Ok(PaymentAttempt {
    merchant_uid,
    amount: product.price,
    pay_method: config.pay_method.clone(),
    platform,
    buyer: BuyerSnapshot {
      name: or_placeholder(&buyer.name, PLACEHOLDER_BUYER_NAME),
      email: buyer.email.clone(),
      phone: or_placeholder(&buyer.phone, PLACEHOLDER_BUYER_PHONE),
      postal_code: buyer.address.postal_code().to_string(),
      address: buyer.address.one_line(),
    },
    product_name: product.name.clone(),
    product_category: product.category.clone(),
    quantity: 1,
    shipping_address: delivery.address.one_line(),
    order_notes: delivery.message.clone(),
    created_at: Utc::now(),
  })
}

async fn prepare_attempt(ctx: Ctx) -> Result<PipelineControl, CheckoutError> {
  let (attempt, request) = {
    let guard = ctx.read();
    let merchant_uid = guard.deps.uids.next();
    let attempt = build_attempt(&guard.snapshot, &guard.deps.config, guard.platform, merchant_uid)?;
    let request = PaymentData::for_attempt(&attempt, &guard.deps.config);
    (attempt, request)
  };

  info!(
    merchant_uid = %attempt.merchant_uid,
    amount = attempt.amount,
    platform = %attempt.platform,
    "Payment attempt prepared."
  );

  let slot = ctx.read().slot.clone();
  if let Some(in_flight) = slot.lock().in_flight.as_mut() {
    in_flight.merchant_uid = Some(attempt.merchant_uid.clone());
  }

  let mut guard = ctx.write();
  guard.attempt = Some(attempt);
  guard.request = Some(request);
  Ok(PipelineControl::Continue)
}

enum GatewaySignal {
  Payload(Value),
  Closed,
  Cancelled,
  TimedOut(Duration),
}

async fn wait_for_callback(rx: oneshot::Receiver<Value>, cancel: &Notify, timeout: Option<Duration>) -> GatewaySignal {
  let deadline = async {
    match timeout {
      Some(waited) => {
        tokio::time::sleep(waited).await;
        waited
      }
      None => std::future::pending().await,
    }
  };

  // A callback that is already delivered wins over a cancel or deadline firing at the same time.
  tokio::select! {
    biased;
    received = rx => match received {
      Ok(payload) => GatewaySignal::Payload(payload),
      Err(_) => GatewaySignal::Closed,
    },
    _ = cancel.notified() => GatewaySignal::Cancelled,
    waited = deadline => GatewaySignal::TimedOut(waited),
  }
}

fn gateway_failure(err: GatewayError) -> CheckoutError {
  match err {
    GatewayError::NotLoaded => CheckoutError::GatewayUnavailable,
    GatewayError::Rejected(message) => CheckoutError::Config(message),
  }
}

async fn await_gateway(ctx: Ctx) -> Result<PipelineControl, CheckoutError> {
  let (gateway, config, cancel, request) = {
    let guard = ctx.read();
    let request = guard
      .request
      .clone()
      .ok_or_else(|| CheckoutError::Config("payment request was not prepared".to_string()))?;
    (guard.deps.gateway.clone(), guard.deps.config.clone(), guard.cancel.clone(), request)
  };
  let merchant_uid = request.merchant_uid.clone();

  if cancel_requested(&ctx) {
    info!(%merchant_uid, "Attempt cancelled before the gateway was opened.");
    return Ok(finish(
      &ctx,
      AttemptOutcome::Cancelled {
        merchant_uid: Some(merchant_uid),
      },
    ));
  }

  if let Err(err) = gateway.init(&config.merchant_id) {
    warn!(%merchant_uid, error = %err, "Gateway initialization failed.");
    return Ok(finish(&ctx, AttemptOutcome::Failed(gateway_failure(err))));
  }

  let (callback, rx) = GatewayCallback::channel(&merchant_uid);
  if let Err(err) = gateway.request_pay(request, callback) {
    warn!(%merchant_uid, error = %err, "Gateway refused to open the payment window.");
    return Ok(finish(&ctx, AttemptOutcome::Failed(gateway_failure(err))));
  }
  debug!(%merchant_uid, timeout = ?config.gateway_timeout, "Waiting for gateway callback.");

  match wait_for_callback(rx, &cancel, config.gateway_timeout).await {
    GatewaySignal::Payload(payload) => {
      ctx.write().raw_payload = Some(payload);
      Ok(PipelineControl::Continue)
    }
    GatewaySignal::Closed => {
      warn!(%merchant_uid, "Gateway released the callback without responding.");
      ctx.write().raw_payload = None;
      Ok(PipelineControl::Continue)
    }
    GatewaySignal::Cancelled => {
      info!(%merchant_uid, "Attempt cancelled while waiting for the gateway.");
      Ok(finish(
        &ctx,
        AttemptOutcome::Cancelled {
          merchant_uid: Some(merchant_uid),
        },
      ))
    }
    GatewaySignal::TimedOut(waited) => {
      warn!(%merchant_uid, waited_secs = waited.as_secs_f64(), "Gateway callback timed out.");
      Ok(finish(&ctx, AttemptOutcome::Failed(CheckoutError::GatewayTimeout { waited })))
    }
  }
}

async fn classify_response(ctx: Ctx) -> Result<PipelineControl, CheckoutError> {
  let outcome = {
    let guard = ctx.read();
    let payload = guard.raw_payload.as_ref().and_then(GatewayPayload::normalize);
    if let (Some(reported), Some(attempt)) = (
      payload.as_ref().and_then(|p| p.merchant_uid.as_deref()),
      guard.attempt.as_ref(),
    ) {
      if reported != attempt.merchant_uid {
        warn!(expected = %attempt.merchant_uid, %reported, "Gateway reported a different merchant uid.");
      }
    }
    classify(payload.as_ref(), guard.platform)
  };
  let merchant_uid = current_merchant_uid(&ctx);
  info!(merchant_uid = merchant_uid.as_deref().unwrap_or_default(), ?outcome, "Gateway response classified.");

  let control = match &outcome {
    GatewayOutcome::Success { .. } => PipelineControl::Continue,
    GatewayOutcome::UserCancelled => finish(&ctx, AttemptOutcome::Cancelled { merchant_uid }),
    GatewayOutcome::RedirectConfigError { message } => finish(
      &ctx,
      AttemptOutcome::Failed(CheckoutError::RedirectConfig {
        message: message.clone(),
      }),
    ),
    GatewayOutcome::TransientFailure { code, message } => finish(
      &ctx,
      AttemptOutcome::Failed(CheckoutError::Transient {
        code: code.clone(),
        message: message.clone(),
      }),
    ),
  };
  ctx.write().classification = Some(outcome);
  Ok(control)
}

async fn confirm_with_backend(ctx: Ctx) -> Result<PipelineControl, CheckoutError> {
  let (backend, confirmation) = {
    let guard = ctx.read();
    let attempt = guard
      .attempt
      .as_ref()
      .ok_or_else(|| CheckoutError::Config("no attempt to confirm".to_string()))?;
    let imp_uid = match &guard.classification {
      Some(GatewayOutcome::Success { external_transaction_id }) => external_transaction_id.clone(),
      _ => None,
    };
    (guard.deps.backend.clone(), PaymentConfirmation::from_attempt(attempt, imp_uid))
  };

  let outcome = match backend.confirm_payment(&confirmation).await {
    Ok(receipt) => {
      info!(
        merchant_uid = %confirmation.merchant_uid,
        order_number = %receipt.order_number,
        "Payment confirmed with backend."
      );
      AttemptOutcome::Completed(receipt)
    }
    Err(BackendError::AuthExpired) => {
      warn!(merchant_uid = %confirmation.merchant_uid, "Backend rejected the confirmation as unauthenticated.");
      AttemptOutcome::Failed(CheckoutError::AuthExpired)
    }
    Err(err) => {
      warn!(merchant_uid = %confirmation.merchant_uid, error = %err, "Backend failed to save the payment.");
      AttemptOutcome::Failed(CheckoutError::SaveFailed(err.to_string()))
    }
  };
  Ok(finish(&ctx, outcome))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::{BuyerProfile, DeliveryInfo, Product};

  fn snapshot(product: Option<Product>, email: &str) -> SubmissionSnapshot {
    SubmissionSnapshot {
      product,
      buyer: BuyerProfile {
        email: email.to_string(),
        ..BuyerProfile::default()
      },
      delivery: DeliveryInfo::default(),
    }
  }

  fn config() -> CheckoutConfig {
    CheckoutConfig::for_environment(crate::config::Environment::Development)
  }

  #[test]
  fn checks_run_in_order() {
    let none = snapshot(None, "");
    assert!(matches!(
      check_submission(&none, &config(), false),
      Some(CheckoutError::Validation(ValidationError::NoProduct))
    ));

    let free = snapshot(Some(Product::new("p1", "Mat", 0, "yoga")), "");
    assert!(matches!(
      check_submission(&free, &config(), false),
      Some(CheckoutError::Validation(ValidationError::InvalidPrice))
    ));

    let no_email = snapshot(Some(Product::new("p1", "Mat", 10_000, "yoga")), " ");
    assert!(matches!(
      check_submission(&no_email, &config(), false),
      Some(CheckoutError::Validation(ValidationError::MissingEmail))
    ));

    let ready = snapshot(Some(Product::new("p1", "Mat", 10_000, "yoga")), "a@b.c");
    assert!(matches!(
      check_submission(&ready, &config(), false),
      Some(CheckoutError::GatewayUnavailable)
    ));
    assert!(matches!(
      check_submission(&ready, &config().with_merchant_id(""), true),
      Some(CheckoutError::Config(_))
    ));
    assert!(check_submission(&ready, &config(), true).is_none());
  }

  #[test]
  fn attempt_uses_placeholders_for_blank_contact_fields() {
    let snap = snapshot(Some(Product::new("p1", "Mat", 10_000, "yoga")), "a@b.c");
    let attempt = build_attempt(&snap, &config(), Platform::Desktop, "order_1".into()).unwrap();
    assert_eq!(attempt.buyer.name, PLACEHOLDER_BUYER_NAME);
    assert_eq!(attempt.buyer.phone, PLACEHOLDER_BUYER_PHONE);
    assert_eq!(attempt.amount, 10_000);
    assert_eq!(attempt.quantity, 1);
  }

  #[tokio::test]
  async fn biased_wait_prefers_a_delivered_callback() {
    let (tx, rx) = oneshot::channel();
    let cancel = Notify::new();
    tx.send(serde_json::json!({"success": true})).unwrap();
    cancel.notify_one();
    let signal = wait_for_callback(rx, &cancel, Some(Duration::ZERO)).await;
    assert!(matches!(signal, GatewaySignal::Payload(_)));
  }

  #[tokio::test]
  async fn wait_times_out_without_a_callback() {
    let (_tx, rx) = oneshot::channel::<Value>();
    let cancel = Notify::new();
    let signal = wait_for_callback(rx, &cancel, Some(Duration::from_millis(10))).await;
    assert!(matches!(signal, GatewaySignal::TimedOut(d) if d == Duration::from_millis(10)));
  }
}
