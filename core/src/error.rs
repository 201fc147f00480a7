// checkout_flow/src/error.rs
use anyhow::Error as AnyhowError;
use std::time::Duration;
use thiserror::Error;

/// Errors raised by the step pipeline itself.
#[derive(Debug, Error)]
pub enum FlowError {
  #[error("Step not found: {step_name}")]
  StepNotFound { step_name: String },

  #[error("Handler missing for required step: {step_name}")]
  HandlerMissing { step_name: String },

  #[error("Error in step handler. Source: {source}")]
  HandlerError {
    #[source]
    source: AnyhowError,
  },

  #[error("Internal pipeline error: {0}")]
  Internal(String),
}

impl From<AnyhowError> for FlowError {
  fn from(err: AnyhowError) -> Self {
    FlowError::HandlerError { source: err }
  }
}

/// Order-entry input that cannot be accepted, or a submission that is not ready.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("no product is loaded for checkout")]
  NoProduct,

  #[error("product price must be greater than zero")]
  InvalidPrice,

  #[error("buyer email is required")]
  MissingEmail,

  #[error("unknown field '{field}' in section {section}")]
  UnknownField { section: String, field: String },

  #[error("invalid value '{value}' for field '{field}'")]
  InvalidValue { field: String, value: String },

  #[error("field '{field}' can only be set through an address lookup")]
  AddressLocked { field: String },

  #[error("section {section} has no address")]
  NoAddress { section: String },
}

/// Everything that can end a checkout attempt in `Failed`, plus the in-flight rejection.
#[derive(Debug, Error)]
pub enum CheckoutError {
  #[error("Configuration error: {0}")]
  Config(String),

  #[error("Payment gateway SDK is not loaded")]
  GatewayUnavailable,

  #[error("Validation error: {0}")]
  Validation(#[from] ValidationError),

  #[error("Gateway redirect URL is missing or invalid: {message}")]
  RedirectConfig { message: String },

  #[error("Gateway failure{}: {message}", .code.as_deref().map(|c| format!(" ({c})")).unwrap_or_default())]
  Transient { code: Option<String>, message: String },

  #[error("No gateway callback within {}s", .waited.as_secs())]
  GatewayTimeout { waited: Duration },

  #[error("Backend rejected the session as unauthenticated or expired")]
  AuthExpired,

  #[error("Backend could not save the payment: {0}")]
  SaveFailed(String),

  #[error("Could not fetch the buyer profile: {0}")]
  ProfileFetch(String),

  #[error("A payment attempt is already in flight")]
  AttemptInFlight,

  #[error("Checkout workflow error: {source}")]
  Flow {
    #[from]
    source: FlowError,
  },
}

impl CheckoutError {
  /// The text shown to the buyer for this error.
  pub fn user_message(&self) -> String {
    match self {
      CheckoutError::Config(_) | CheckoutError::GatewayUnavailable | CheckoutError::Flow { .. } => {
        "Payment is not available right now. Please contact the administrator.".to_string()
      }
      CheckoutError::Validation(ValidationError::NoProduct) => "There is no product to pay for.".to_string(),
      CheckoutError::Validation(ValidationError::InvalidPrice) => "The product price is not valid.".to_string(),
      CheckoutError::Validation(ValidationError::MissingEmail) => {
        "Please enter an email address before paying.".to_string()
      }
      CheckoutError::Validation(other) => other.to_string(),
      CheckoutError::RedirectConfig { .. } => {
        "The payment page could not return to the store because its redirect address is not configured. Please contact the administrator.".to_string()
      }
      CheckoutError::Transient { message, .. } => format!("Payment failed: {message}"),
      CheckoutError::GatewayTimeout { .. } => "The payment window did not respond in time. Please try again.".to_string(),
      CheckoutError::AuthExpired => "Your session has expired. Please log in again.".to_string(),
      CheckoutError::SaveFailed(_) => {
        "The payment went through but could not be saved. Please contact support.".to_string()
      }
      CheckoutError::ProfileFetch(_) => "Your profile could not be loaded.".to_string(),
      CheckoutError::AttemptInFlight => "A payment is already in progress.".to_string(),
    }
  }

  /// Whether starting a brand-new attempt may succeed.
  pub fn is_retryable(&self) -> bool {
    matches!(
      self,
      CheckoutError::Transient { .. } | CheckoutError::GatewayTimeout { .. } | CheckoutError::SaveFailed(_)
    )
  }
}

pub type CheckoutResult<T, E = CheckoutError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn auth_expired_and_save_failed_have_distinct_messages() {
    let auth = CheckoutError::AuthExpired.user_message();
    let save = CheckoutError::SaveFailed("500".into()).user_message();
    assert!(auth.contains("log in again"));
    assert!(save.contains("could not be saved"));
    assert_ne!(auth, save);
  }

  #[test]
  fn config_errors_point_to_the_administrator() {
    assert!(CheckoutError::GatewayUnavailable.user_message().contains("administrator"));
    assert!(CheckoutError::Config("merchant id".into()).user_message().contains("administrator"));
  }

  #[test]
  fn transient_display_includes_code_when_present() {
    let err = CheckoutError::Transient {
      code: Some("X999".into()),
      message: "network".into(),
    };
    assert_eq!(err.to_string(), "Gateway failure (X999): network");
    assert!(err.is_retryable());
    assert!(!CheckoutError::AuthExpired.is_retryable());
  }
}
