// checkout_flow/src/orchestrator/mod.rs

//! Drives one payment attempt at a time from submission to a terminal state.
//!
//! `submit` runs the attempt pipeline (see `steps`) against a snapshot of the
//! session. The orchestrator owns the FSM state and the cancel handle of the
//! attempt in flight; a second `submit` while one is running is rejected.

mod context;
mod state;
mod steps;

pub use state::{AttemptOutcome, CheckoutState};

use crate::attempt::MerchantUidGenerator;
use crate::backend::BackendConfirmation;
use crate::config::CheckoutConfig;
use crate::core::ContextData;
use crate::error::{CheckoutError, CheckoutResult, FlowError};
use crate::gateway::PaymentGateway;
use crate::pipeline::Pipeline;
use crate::platform::Platform;
use crate::session::CheckoutSession;
use context::{AttemptCtxData, AttemptSlot, Collaborators, InFlight, SubmissionSnapshot};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::Notify;
use tracing::{info, instrument, warn};

pub struct PaymentOrchestrator {
  deps: Collaborators,
  slot: Arc<Mutex<AttemptSlot>>,
  pipeline: Pipeline<AttemptCtxData, CheckoutError>,
}

/// Releases the slot if a `submit` future is dropped before it finishes.
struct SlotRelease {
  slot: Arc<Mutex<AttemptSlot>>,
  armed: bool,
}

impl Drop for SlotRelease {
  fn drop(&mut self) {
    if self.armed {
      let mut slot = self.slot.lock();
      warn!(state = %slot.state, "Attempt abandoned before reaching a terminal state.");
      slot.state = CheckoutState::Cancelled;
      slot.in_flight = None;
    }
  }
}

impl PaymentOrchestrator {
  pub fn new(
    config: Arc<CheckoutConfig>,
    gateway: Arc<dyn PaymentGateway>,
    backend: Arc<dyn BackendConfirmation>,
  ) -> Self {
    Self {
      deps: Collaborators {
        config,
        gateway,
        backend,
        uids: MerchantUidGenerator::new(),
      },
      slot: Arc::new(Mutex::new(AttemptSlot::idle())),
      pipeline: steps::build_attempt_pipeline(),
    }
  }

  pub fn config(&self) -> &CheckoutConfig {
    &self.deps.config
  }

  pub fn state(&self) -> CheckoutState {
    self.slot.lock().state
  }

  /// False while an attempt is in flight.
  pub fn can_submit(&self) -> bool {
    !self.state().is_in_flight()
  }

  pub fn current_merchant_uid(&self) -> Option<String> {
    self
      .slot
      .lock()
      .in_flight
      .as_ref()
      .and_then(|in_flight| in_flight.merchant_uid.clone())
  }

  /// Runs one attempt to completion.
  ///
  /// Returns `Err(CheckoutError::AttemptInFlight)` without side effects when
  /// another attempt is running; every other ending is an `AttemptOutcome`.
  #[instrument(name = "PaymentOrchestrator::submit", skip_all, fields(%platform))]
  pub async fn submit(&self, session: &CheckoutSession, platform: Platform) -> CheckoutResult<AttemptOutcome> {
    let cancel = Arc::new(Notify::new());
    {
      let mut slot = self.slot.lock();
      if slot.state.is_in_flight() {
        warn!(state = %slot.state, "Submission rejected: an attempt is already in flight.");
        return Err(CheckoutError::AttemptInFlight);
      }
      slot.state = CheckoutState::Validating;
      slot.in_flight = Some(InFlight {
        merchant_uid: None,
        cancel_requested: false,
        cancel: cancel.clone(),
      });
    }
    let mut release = SlotRelease {
      slot: self.slot.clone(),
      armed: true,
    };

    let ctx = ContextData::new(AttemptCtxData::new(
      self.deps.clone(),
      self.slot.clone(),
      cancel,
      SubmissionSnapshot::from(session),
      platform,
    ));

    let outcome = match self.pipeline.run(ctx.clone()).await {
      Ok(result) => {
        let recorded = ctx.write().outcome.take();
        recorded.unwrap_or_else(|| {
          AttemptOutcome::Failed(
            FlowError::Internal(format!("attempt pipeline ended ({result:?}) without an outcome")).into(),
          )
        })
      }
      Err(err) => AttemptOutcome::Failed(err),
    };

    {
      let mut slot = self.slot.lock();
      slot.state = outcome.state();
      slot.in_flight = None;
    }
    release.armed = false;

    info!(state = %outcome.state(), "Payment attempt finished.");
    Ok(outcome)
  }

  /// Requests cancellation of the attempt in flight.
  ///
  /// Only honored before the gateway has responded; returns whether the
  /// request was accepted. A cancel accepted before the payment window opens
  /// ends the attempt without opening it.
  pub fn cancel(&self) -> bool {
    let mut slot = self.slot.lock();
    let state = slot.state;
    match (state, slot.in_flight.as_mut()) {
      (CheckoutState::Validating | CheckoutState::AwaitingGateway, Some(in_flight)) => {
        info!(merchant_uid = ?in_flight.merchant_uid, %state, "Cancellation requested.");
        in_flight.cancel_requested = true;
        in_flight.cancel.notify_one();
        true
      }
      (state, _) => {
        info!(%state, "Cancellation ignored.");
        false
      }
    }
  }
}
