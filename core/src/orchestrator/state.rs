// checkout_flow/src/orchestrator/state.rs
use crate::error::CheckoutError;
use crate::models::OrderReceipt;
use std::fmt;

/// Where the orchestrator is in the current (or last) attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutState {
  Idle,
  Validating,
  AwaitingGateway,
  Classifying,
  ConfirmingBackend,
  Completed,
  Cancelled,
  Failed,
}

impl CheckoutState {
  /// An attempt is running; new submissions are rejected.
  pub fn is_in_flight(self) -> bool {
    matches!(
      self,
      CheckoutState::Validating
        | CheckoutState::AwaitingGateway
        | CheckoutState::Classifying
        | CheckoutState::ConfirmingBackend
    )
  }

  pub fn is_terminal(self) -> bool {
    matches!(
      self,
      CheckoutState::Completed | CheckoutState::Cancelled | CheckoutState::Failed
    )
  }
}

impl fmt::Display for CheckoutState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    fmt::Debug::fmt(self, f)
  }
}

/// How an attempt ended.
#[derive(Debug)]
pub enum AttemptOutcome {
  Completed(OrderReceipt),
  /// The buyer backed out. Not an error; no retry prompt.
  Cancelled { merchant_uid: Option<String> },
  Failed(CheckoutError),
}

impl AttemptOutcome {
  pub fn state(&self) -> CheckoutState {
    match self {
      AttemptOutcome::Completed(_) => CheckoutState::Completed,
      AttemptOutcome::Cancelled { .. } => CheckoutState::Cancelled,
      AttemptOutcome::Failed(_) => CheckoutState::Failed,
    }
  }

  pub fn receipt(&self) -> Option<&OrderReceipt> {
    match self {
      AttemptOutcome::Completed(receipt) => Some(receipt),
      _ => None,
    }
  }

  pub fn error(&self) -> Option<&CheckoutError> {
    match self {
      AttemptOutcome::Failed(err) => Some(err),
      _ => None,
    }
  }

  pub fn user_message(&self) -> String {
    match self {
      AttemptOutcome::Completed(receipt) => format!("Order {} is confirmed.", receipt.order_number),
      AttemptOutcome::Cancelled { .. } => "Payment was cancelled.".to_string(),
      AttemptOutcome::Failed(err) => err.user_message(),
    }
  }
}
