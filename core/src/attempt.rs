// checkout_flow/src/attempt.rs

//! One submission cycle and the ids that keep attempts apart.

use crate::platform::Platform;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicI64, Ordering};

/// Last millisecond value handed out by any generator in this process.
static LAST_ISSUED: AtomicI64 = AtomicI64::new(0);

/// Issues merchant order ids of the form `order_<millis>`.
///
/// Ids are strictly increasing across the whole process, whichever generator
/// or orchestrator asks: when two attempts fall in the same millisecond (or
/// the clock steps back) the later one is bumped past the last id issued.
#[derive(Debug, Default, Clone, Copy)]
pub struct MerchantUidGenerator;

impl MerchantUidGenerator {
  pub fn new() -> Self {
    Self
  }

  pub fn next(&self) -> String {
    let now = Utc::now().timestamp_millis();
    let mut prev = LAST_ISSUED.load(Ordering::Relaxed);
    loop {
      let candidate = now.max(prev + 1);
      match LAST_ISSUED.compare_exchange_weak(prev, candidate, Ordering::AcqRel, Ordering::Relaxed) {
        Ok(_) => return format!("order_{}", candidate),
        Err(actual) => prev = actual,
      }
    }
  }
}

/// Contact details copied from the session when the attempt is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuyerSnapshot {
  pub name: String,
  pub email: String,
  pub phone: String,
  pub postal_code: String,
  pub address: String,
}

/// A single submission. Never reused: retrying means building a new attempt
/// with a new `merchant_uid`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentAttempt {
  pub merchant_uid: String,
  /// Product price at submission time.
  pub amount: u64,
  pub pay_method: String,
  pub platform: Platform,
  pub buyer: BuyerSnapshot,
  pub product_name: String,
  pub product_category: String,
  pub quantity: u32,
  pub shipping_address: String,
  pub order_notes: String,
  pub created_at: DateTime<Utc>,
}
