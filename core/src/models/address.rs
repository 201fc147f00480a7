// checkout_flow/src/models/address.rs
use serde::{Deserialize, Serialize};

/// A postal address as held by the order-entry screen.
///
/// `postal_code` and `base_address` come as a unit from the address lookup and
/// have no public setters; only `detail_address` is typed by the buyer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostalAddress {
  postal_code: String,
  base_address: String,
  pub detail_address: String,
}

impl PostalAddress {
  pub fn postal_code(&self) -> &str {
    &self.postal_code
  }

  pub fn base_address(&self) -> &str {
    &self.base_address
  }

  pub fn is_empty(&self) -> bool {
    self.postal_code.is_empty() && self.base_address.is_empty() && self.detail_address.is_empty()
  }

  /// Sets postal code and base address together. With `clear_detail` the detail
  /// address is replaced by the lookup's; otherwise a non-empty detail is kept.
  pub(crate) fn apply_lookup(&mut self, result: &AddressLookupResult, clear_detail: bool) {
    self.postal_code = result.zip_code.trim().to_string();
    self.base_address = result.address.trim().to_string();
    if clear_detail || self.detail_address.trim().is_empty() {
      self.detail_address = result.detail_address.trim().to_string();
    }
  }

  /// Single-line form used for the backend `shippingAddress` field.
  pub fn one_line(&self) -> String {
    let mut out = String::new();
    if !self.postal_code.is_empty() {
      out.push_str(&format!("({}) ", self.postal_code));
    }
    out.push_str(&self.base_address);
    if !self.detail_address.is_empty() {
      if !self.base_address.is_empty() {
        out.push(' ');
      }
      out.push_str(&self.detail_address);
    }
    out.trim().to_string()
  }
}

/// What the address-lookup widget hands back on completion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressLookupResult {
  pub zip_code: String,
  pub address: String,
  #[serde(default)]
  pub detail_address: String,
}
