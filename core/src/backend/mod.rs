// checkout_flow/src/backend/mod.rs

//! The REST backend as seen from checkout: profile lookup and payment confirmation.

pub mod rest;

pub use rest::RestBackend;

use crate::attempt::PaymentAttempt;
use crate::error::{CheckoutError, CheckoutResult};
use crate::models::{BuyerProfile, OrderReceipt, UserProfile};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum BackendError {
  #[error("session is unauthenticated or expired")]
  AuthExpired,

  #[error("backend rejected the request ({status}): {body}")]
  Rejected { status: u16, body: String },

  #[error("backend unreachable: {0}")]
  Transport(String),

  #[error("unexpected backend response: {0}")]
  Decode(String),
}

/// Body of `POST /payments/process`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentConfirmation {
  pub merchant_uid: String,
  pub imp_uid: Option<String>,
  pub product_name: String,
  pub amount: u64,
  pub payment_method: String,
  pub product_category: String,
  pub quantity: u32,
  pub shipping_address: String,
  pub order_notes: String,
}

impl PaymentConfirmation {
  pub fn from_attempt(attempt: &PaymentAttempt, imp_uid: Option<String>) -> Self {
    Self {
      merchant_uid: attempt.merchant_uid.clone(),
      imp_uid,
      product_name: attempt.product_name.clone(),
      amount: attempt.amount,
      payment_method: attempt.pay_method.clone(),
      product_category: attempt.product_category.clone(),
      quantity: attempt.quantity,
      shipping_address: attempt.shipping_address.clone(),
      order_notes: attempt.order_notes.clone(),
    }
  }
}

/// Durably records a successful payment against an order.
#[async_trait]
pub trait BackendConfirmation: Send + Sync {
  async fn confirm_payment(&self, confirmation: &PaymentConfirmation) -> Result<OrderReceipt, BackendError>;
}

/// Reads the authenticated user's record.
#[async_trait]
pub trait UserDirectory: Send + Sync {
  async fn fetch_user(&self, user_id: &str) -> Result<UserProfile, BackendError>;
}

/// Fetches the buyer for prefill, surfacing a failed fetch as `CheckoutError::ProfileFetch`.
pub async fn fetch_buyer_profile(directory: &dyn UserDirectory, user_id: &str) -> CheckoutResult<BuyerProfile> {
  directory
    .fetch_user(user_id)
    .await
    .map(BuyerProfile::from)
    .map_err(|e| CheckoutError::ProfileFetch(e.to_string()))
}

/// Fetches the buyer for prefill. A failed fetch does not block checkout: the
/// buyer gets placeholder name and phone and types the rest by hand.
pub async fn load_buyer_profile(directory: &dyn UserDirectory, user_id: &str) -> BuyerProfile {
  match fetch_buyer_profile(directory, user_id).await {
    Ok(profile) => profile,
    Err(err) => {
      warn!(%user_id, error = %err, "Continuing checkout with a placeholder buyer.");
      BuyerProfile::placeholder()
    }
  }
}
