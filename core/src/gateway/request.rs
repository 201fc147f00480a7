// checkout_flow/src/gateway/request.rs
use crate::attempt::PaymentAttempt;
use crate::config::CheckoutConfig;
use crate::platform::Platform;
use serde::{Deserialize, Serialize};

/// The `paymentData` object handed to the SDK's `request_pay`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentData {
  pub pg: String,
  pub pay_method: String,
  pub merchant_uid: String,
  pub amount: u64,
  pub name: String,
  pub buyer_email: String,
  pub buyer_name: String,
  pub buyer_tel: String,
  #[serde(skip_serializing_if = "String::is_empty", default)]
  pub buyer_addr: String,
  #[serde(skip_serializing_if = "String::is_empty", default)]
  pub buyer_postcode: String,
  pub confirm_url: String,

  // Mobile: the SDK navigates away and comes back through these.
  #[serde(skip_serializing_if = "Option::is_none", default)]
  pub m_redirect_url: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none", default)]
  pub app_scheme: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none", default)]
  pub escrow: Option<bool>,
  #[serde(skip_serializing_if = "Option::is_none", default)]
  pub digital: Option<bool>,

  // Desktop
  #[serde(skip_serializing_if = "Option::is_none", default)]
  pub redirect_url: Option<String>,
}

impl PaymentData {
  pub fn for_attempt(attempt: &PaymentAttempt, config: &CheckoutConfig) -> Self {
    let mut data = PaymentData {
      pg: config.pg_provider.clone(),
      pay_method: attempt.pay_method.clone(),
      merchant_uid: attempt.merchant_uid.clone(),
      amount: attempt.amount,
      name: attempt.product_name.clone(),
      buyer_email: attempt.buyer.email.clone(),
      buyer_name: attempt.buyer.name.clone(),
      buyer_tel: attempt.buyer.phone.clone(),
      buyer_addr: attempt.buyer.address.clone(),
      buyer_postcode: attempt.buyer.postal_code.clone(),
      confirm_url: config.confirm_url.clone(),
      m_redirect_url: None,
      app_scheme: None,
      escrow: None,
      digital: None,
      redirect_url: None,
    };

    match attempt.platform {
      Platform::Mobile => {
        data.m_redirect_url = Some(config.mobile_redirect_url.clone());
        data.app_scheme = Some(config.app_scheme.clone());
        data.escrow = Some(false);
        data.digital = Some(false);
      }
      Platform::Desktop => {
        data.redirect_url = Some(config.desktop_redirect_url.clone());
      }
    }
    data
  }
}
