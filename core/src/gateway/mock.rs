// checkout_flow/src/gateway/mock.rs

//! An in-process stand-in for the payment SDK, driven by a script.

use super::{CallbackDelivery, GatewayCallback, GatewayError, PaymentData, PaymentGateway};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// What the scripted SDK does with one `request_pay`.
#[derive(Debug, Clone)]
pub enum GatewayScript {
  /// Invoke the callback with `payload` after `delay`.
  Respond { payload: Value, delay: Duration },
  /// Invoke the callback twice with the same payload.
  RespondTwice { payload: Value, delay: Duration },
  /// Keep the callback; fire it later with `ScriptedGateway::fire_held`.
  Hold,
  /// Drop the callback without ever invoking it.
  DropCallback,
  /// Fail `request_pay` synchronously.
  Reject(String),
}

impl GatewayScript {
  pub fn respond(payload: Value) -> Self {
    GatewayScript::Respond {
      payload,
      delay: Duration::from_millis(5),
    }
  }
}

pub struct ScriptedGateway {
  loaded: bool,
  default_script: GatewayScript,
  queued: Mutex<VecDeque<GatewayScript>>,
  requests: Mutex<Vec<PaymentData>>,
  held: Mutex<VecDeque<GatewayCallback>>,
  initialized_with: Mutex<Option<String>>,
  deliveries: Arc<Mutex<Vec<CallbackDelivery>>>,
}

impl ScriptedGateway {
  /// A loaded SDK that follows `script` for every request.
  pub fn new(script: GatewayScript) -> Self {
    Self {
      loaded: true,
      default_script: script,
      queued: Mutex::new(VecDeque::new()),
      requests: Mutex::new(Vec::new()),
      held: Mutex::new(VecDeque::new()),
      initialized_with: Mutex::new(None),
      deliveries: Arc::new(Mutex::new(Vec::new())),
    }
  }

  /// An SDK whose script never loaded.
  pub fn unloaded() -> Self {
    Self {
      loaded: false,
      ..Self::new(GatewayScript::DropCallback)
    }
  }

  /// Overrides the script for the next request only.
  pub fn push_script(&self, script: GatewayScript) {
    self.queued.lock().push_back(script);
  }

  pub fn requests(&self) -> Vec<PaymentData> {
    self.requests.lock().clone()
  }

  pub fn request_count(&self) -> usize {
    self.requests.lock().len()
  }

  pub fn initialized_with(&self) -> Option<String> {
    self.initialized_with.lock().clone()
  }

  /// Results of every callback invocation the script performed, in order.
  pub fn deliveries(&self) -> Vec<CallbackDelivery> {
    self.deliveries.lock().clone()
  }

  /// Fires the oldest held callback. `None` when nothing is held.
  pub fn fire_held(&self, payload: Value) -> Option<CallbackDelivery> {
    let callback = self.held.lock().pop_front()?;
    let delivery = callback.invoke(payload);
    self.deliveries.lock().push(delivery);
    Some(delivery)
  }
}

impl PaymentGateway for ScriptedGateway {
  fn is_loaded(&self) -> bool {
    self.loaded
  }

  fn init(&self, merchant_id: &str) -> Result<(), GatewayError> {
    if !self.loaded {
      return Err(GatewayError::NotLoaded);
    }
    *self.initialized_with.lock() = Some(merchant_id.to_string());
    Ok(())
  }

  fn request_pay(&self, data: PaymentData, callback: GatewayCallback) -> Result<(), GatewayError> {
    if !self.loaded {
      return Err(GatewayError::NotLoaded);
    }
    info!(merchant_uid = %data.merchant_uid, amount = data.amount, "Scripted gateway received payment request.");
    self.requests.lock().push(data);

    let script = self
      .queued
      .lock()
      .pop_front()
      .unwrap_or_else(|| self.default_script.clone());

    match script {
      GatewayScript::Respond { payload, delay } => {
        let deliveries = self.deliveries.clone();
        tokio::spawn(async move {
          tokio::time::sleep(delay).await;
          let delivery = callback.invoke(payload);
          deliveries.lock().push(delivery);
        });
      }
      GatewayScript::RespondTwice { payload, delay } => {
        let deliveries = self.deliveries.clone();
        tokio::spawn(async move {
          tokio::time::sleep(delay).await;
          let first = callback.invoke(payload.clone());
          let second = callback.invoke(payload);
          deliveries.lock().extend([first, second]);
        });
      }
      GatewayScript::Hold => self.held.lock().push_back(callback),
      GatewayScript::DropCallback => drop(callback),
      GatewayScript::Reject(reason) => return Err(GatewayError::Rejected(reason)),
    }
    Ok(())
  }
}
