// checkout_flow/src/backend/rest.rs

//! reqwest client for the shop backend.

use super::{BackendConfirmation, BackendError, PaymentConfirmation, UserDirectory};
use crate::config::CheckoutConfig;
use crate::error::{CheckoutError, CheckoutResult};
use crate::models::{OrderReceipt, UserProfile};
use async_trait::async_trait;
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument, warn};

pub struct RestBackend {
  base_url: Url,
  auth_token: Option<String>,
  client: reqwest::Client,
}

impl RestBackend {
  /// `auth_token` is the logged-in user's bearer token; it is only read here.
  pub fn new(config: &CheckoutConfig, auth_token: Option<String>) -> CheckoutResult<Self> {
    let client = reqwest::Client::builder()
      .timeout(config.request_timeout)
      .build()
      .map_err(|e| CheckoutError::Config(format!("Failed to build HTTP client: {}", e)))?;

    let base_url = Url::parse(&config.api_base_url)
      .map_err(|e| CheckoutError::Config(format!("Invalid API base URL '{}': {}", config.api_base_url, e)))?;
    if base_url.cannot_be_a_base() {
      return Err(CheckoutError::Config(format!(
        "API base URL '{}' cannot carry a path",
        config.api_base_url
      )));
    }

    Ok(Self {
      base_url,
      auth_token,
      client,
    })
  }

  /// Appends `segments` to the base path, percent-encoding each one so a
  /// segment can never introduce extra path levels or a query.
  fn url(&self, segments: &[&str]) -> Url {
    let mut url = self.base_url.clone();
    if let Ok(mut path) = url.path_segments_mut() {
      path.pop_if_empty().extend(segments);
    }
    url
  }

  /// Sends one JSON request. With `auth_required` and no token the request is
  /// not sent at all.
  pub async fn request<T: DeserializeOwned>(
    &self,
    method: Method,
    segments: &[&str],
    body: Option<&Value>,
    auth_required: bool,
  ) -> Result<T, BackendError> {
    let url = self.url(segments);
    let path = url.path().to_string();
    let mut builder = self.client.request(method.clone(), url);
    match (&self.auth_token, auth_required) {
      (Some(token), _) => builder = builder.bearer_auth(token),
      (None, true) => return Err(BackendError::AuthExpired),
      (None, false) => {}
    }
    if let Some(body) = body {
      builder = builder.json(body);
    }

    debug!(%method, %path, "Sending backend request.");
    let response = builder.send().await.map_err(map_reqwest_error)?;
    let status = response.status();

    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
      return Err(BackendError::AuthExpired);
    }
    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      warn!(%method, %path, status = status.as_u16(), "Backend request rejected.");
      return Err(BackendError::Rejected {
        status: status.as_u16(),
        body,
      });
    }

    response
      .json::<T>()
      .await
      .map_err(|e| BackendError::Decode(e.to_string()))
  }
}

fn map_reqwest_error(e: reqwest::Error) -> BackendError {
  if e.is_decode() {
    BackendError::Decode(e.to_string())
  } else {
    BackendError::Transport(e.to_string())
  }
}

#[async_trait]
impl BackendConfirmation for RestBackend {
  #[instrument(skip_all, fields(merchant_uid = %confirmation.merchant_uid))]
  async fn confirm_payment(&self, confirmation: &PaymentConfirmation) -> Result<OrderReceipt, BackendError> {
    let body = serde_json::to_value(confirmation).map_err(|e| BackendError::Decode(e.to_string()))?;
    self.request(Method::POST, &["payments", "process"], Some(&body), true).await
  }
}

#[async_trait]
impl UserDirectory for RestBackend {
  async fn fetch_user(&self, user_id: &str) -> Result<UserProfile, BackendError> {
    self.request(Method::GET, &["users", user_id], None, true).await
  }
}
