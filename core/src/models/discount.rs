// checkout_flow/src/models/discount.rs
use serde::{Deserialize, Serialize};

/// Deposit (store credit) and coupon applied to the order.
///
/// `deposit` never exceeds `available_deposit` nor the product price; the
/// session enforces that through `apply`. Deserialized values are capped at
/// the available deposit; the price cap applies once a product is loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "DiscountFields")]
pub struct DiscountState {
  deposit: u64,
  pub coupon_code: String,
  available_deposit: u64,
}

#[derive(Deserialize)]
struct DiscountFields {
  #[serde(default)]
  deposit: u64,
  #[serde(default)]
  coupon_code: String,
  #[serde(default)]
  available_deposit: u64,
}

impl From<DiscountFields> for DiscountState {
  fn from(fields: DiscountFields) -> Self {
    Self {
      deposit: fields.deposit.min(fields.available_deposit),
      coupon_code: fields.coupon_code,
      available_deposit: fields.available_deposit,
    }
  }
}

impl DiscountState {
  pub fn deposit(&self) -> u64 {
    self.deposit
  }

  pub fn available_deposit(&self) -> u64 {
    self.available_deposit
  }

  /// Applies `requested`, capped at the available deposit and `price_cap`.
  /// Returns the value actually applied.
  pub(crate) fn apply(&mut self, requested: u64, price_cap: u64) -> u64 {
    self.deposit = requested.min(self.available_deposit).min(price_cap);
    self.deposit
  }

  pub(crate) fn set_available(&mut self, available: u64, price_cap: u64) {
    self.available_deposit = available;
    self.apply(self.deposit, price_cap);
  }

  pub fn total_for(&self, price: u64) -> u64 {
    price.saturating_sub(self.deposit)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn deserialized_deposit_is_capped_at_available() {
    let state: DiscountState =
      serde_json::from_str(r#"{"deposit": 9000, "coupon_code": "WELCOME10", "available_deposit": 3000}"#).unwrap();
    assert_eq!(state.deposit(), 3_000);
    assert_eq!(state.available_deposit(), 3_000);
    assert_eq!(state.coupon_code, "WELCOME10");

    let empty: DiscountState = serde_json::from_str("{}").unwrap();
    assert_eq!(empty, DiscountState::default());
  }

  #[test]
  fn apply_caps_at_price_and_available() {
    let mut state = DiscountState::default();
    state.set_available(5_000, 10_000);
    assert_eq!(state.apply(8_000, 10_000), 5_000);
    assert_eq!(state.apply(8_000, 4_000), 4_000);
    assert_eq!(state.total_for(4_000), 0);
  }
}
