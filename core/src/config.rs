// checkout_flow/src/config.rs

use crate::error::{CheckoutError, CheckoutResult};
use dotenvy::dotenv;
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Default bound on how long the gateway may keep the payment window open.
pub const DEFAULT_GATEWAY_TIMEOUT: Duration = Duration::from_secs(600);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
  Development,
  Production,
}

impl FromStr for Environment {
  type Err = CheckoutError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "development" | "dev" => Ok(Environment::Development),
      "production" | "prod" => Ok(Environment::Production),
      other => Err(CheckoutError::Config(format!(
        "Unknown environment '{}', expected development or production",
        other
      ))),
    }
  }
}

impl fmt::Display for Environment {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Environment::Development => f.write_str("development"),
      Environment::Production => f.write_str("production"),
    }
  }
}

/// Checkout configuration. Built once and handed to the orchestrator behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutConfig {
  pub environment: Environment,
  /// Merchant identifier passed to the gateway SDK's `init`.
  pub merchant_id: String,
  /// `pg` field of the payment request.
  pub pg_provider: String,
  /// The single enabled payment method.
  pub pay_method: String,
  pub mobile_redirect_url: String,
  pub desktop_redirect_url: String,
  /// App scheme the gateway returns to from external card/bank apps on mobile.
  pub app_scheme: String,
  pub confirm_url: String,
  pub api_base_url: String,
  pub request_timeout: Duration,
  /// `None` waits on the gateway for as long as the SDK keeps the window open.
  pub gateway_timeout: Option<Duration>,
}

impl CheckoutConfig {
  /// The static bundle for `environment`.
  pub fn for_environment(environment: Environment) -> Self {
    match environment {
      Environment::Development => Self {
        environment,
        merchant_id: "imp_dev_00000000".to_string(),
        pg_provider: "html5_inicis.INIpayTest".to_string(),
        pay_method: "card".to_string(),
        mobile_redirect_url: "http://localhost:3000/payment/complete".to_string(),
        desktop_redirect_url: "http://localhost:3000/order/complete".to_string(),
        app_scheme: "fitcart-dev".to_string(),
        confirm_url: "http://localhost:8080/payments/confirm".to_string(),
        api_base_url: "http://localhost:8080".to_string(),
        request_timeout: DEFAULT_REQUEST_TIMEOUT,
        gateway_timeout: Some(DEFAULT_GATEWAY_TIMEOUT),
      },
      Environment::Production => Self {
        environment,
        merchant_id: "imp_prod_00000000".to_string(),
        pg_provider: "html5_inicis".to_string(),
        pay_method: "card".to_string(),
        mobile_redirect_url: "https://shop.fitcart.app/payment/complete".to_string(),
        desktop_redirect_url: "https://shop.fitcart.app/order/complete".to_string(),
        app_scheme: "fitcart".to_string(),
        confirm_url: "https://api.fitcart.app/payments/confirm".to_string(),
        api_base_url: "https://api.fitcart.app".to_string(),
        request_timeout: DEFAULT_REQUEST_TIMEOUT,
        gateway_timeout: Some(DEFAULT_GATEWAY_TIMEOUT),
      },
    }
  }

  /// Loads `.env` if present, selects the bundle from `CHECKOUT_ENV` and applies overrides.
  pub fn from_env() -> CheckoutResult<Self> {
    dotenv().ok();

    let get_env = |var_name: &str| env::var(var_name).ok().filter(|v| !v.trim().is_empty());

    let environment = match get_env("CHECKOUT_ENV") {
      Some(raw) => raw.parse::<Environment>()?,
      None => Environment::Development,
    };
    let mut config = Self::for_environment(environment);

    if let Some(merchant_id) = get_env("CHECKOUT_MERCHANT_ID") {
      config.merchant_id = merchant_id;
    }
    if let Some(api_base_url) = get_env("CHECKOUT_API_BASE_URL") {
      config.api_base_url = api_base_url;
    }
    if let Some(raw) = get_env("CHECKOUT_GATEWAY_TIMEOUT_SECS") {
      let secs = parse_secs("CHECKOUT_GATEWAY_TIMEOUT_SECS", &raw)?;
      config.gateway_timeout = (secs > 0).then(|| Duration::from_secs(secs));
    }
    if let Some(raw) = get_env("CHECKOUT_REQUEST_TIMEOUT_SECS") {
      config.request_timeout = Duration::from_secs(parse_secs("CHECKOUT_REQUEST_TIMEOUT_SECS", &raw)?);
    }

    tracing::info!(environment = %config.environment, "Checkout configuration loaded.");
    Ok(config)
  }

  pub fn with_gateway_timeout(mut self, timeout: Option<Duration>) -> Self {
    self.gateway_timeout = timeout;
    self
  }

  pub fn with_merchant_id(mut self, merchant_id: impl Into<String>) -> Self {
    self.merchant_id = merchant_id.into();
    self
  }
}

fn parse_secs(var_name: &str, raw: &str) -> CheckoutResult<u64> {
  raw
    .trim()
    .parse::<u64>()
    .map_err(|e| CheckoutError::Config(format!("Invalid {}: {}", var_name, e)))
}
