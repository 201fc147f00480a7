// checkout_flow/src/session.rs

//! Order-entry state held between the order page and the payment modal.
//!
//! The session validates nothing across fields while the buyer types; the
//! single readiness gate is `is_ready_for_payment`. Everything the payment
//! attempt needs is read from here as a snapshot at submission time.

use crate::error::{CheckoutResult, ValidationError};
use crate::models::{
  AddressLookupResult, AgreementFlag, AgreementState, BuyerProfile, DeliveryInfo, DiscountState, PostalAddress,
  Product,
};
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
  Buyer,
  Delivery,
  Discount,
}

impl fmt::Display for Section {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Section::Buyer => "buyer",
      Section::Delivery => "delivery",
      Section::Discount => "discount",
    };
    f.write_str(name)
  }
}

#[derive(Debug, Clone, Default)]
pub struct CheckoutSession {
  product: Option<Product>,
  buyer: BuyerProfile,
  delivery: DeliveryInfo,
  discount: DiscountState,
  agreement: AgreementState,
}

impl CheckoutSession {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_product(product: Product) -> Self {
    let mut session = Self::new();
    session.load_product(product);
    session
  }

  /// Replaces the product as a whole; the deposit is re-clamped to the new price.
  pub fn load_product(&mut self, product: Product) {
    let price = product.price;
    self.product = Some(product);
    let available = self.discount.available_deposit();
    self.discount.set_available(available, price);
  }

  pub fn product(&self) -> Option<&Product> {
    self.product.as_ref()
  }

  pub fn buyer(&self) -> &BuyerProfile {
    &self.buyer
  }

  pub fn delivery(&self) -> &DeliveryInfo {
    &self.delivery
  }

  pub fn discount(&self) -> &DiscountState {
    &self.discount
  }

  pub fn agreement(&self) -> &AgreementState {
    &self.agreement
  }

  /// Replaces the buyer, e.g. with a profile prefilled from the user record.
  /// The orderer address typed so far is kept when the new profile has none.
  pub fn set_buyer(&mut self, mut profile: BuyerProfile) {
    if profile.address.is_empty() {
      profile.address = std::mem::take(&mut self.buyer.address);
    }
    self.buyer = profile;
  }

  /// Merges a single typed value into the named section.
  pub fn update_field(&mut self, section: Section, field: &str, value: impl Into<String>) -> CheckoutResult<()> {
    let value = value.into();
    match section {
      Section::Buyer => self.update_buyer_field(field, value)?,
      Section::Delivery => self.update_delivery_field(field, value)?,
      Section::Discount => self.update_discount_field(field, value)?,
    }
    Ok(())
  }

  fn update_buyer_field(&mut self, field: &str, value: String) -> Result<(), ValidationError> {
    match field {
      "name" => self.buyer.name = value,
      "email" => self.buyer.email = value,
      "phone" => self.buyer.phone = value,
      "detail_address" => self.buyer.address.detail_address = value,
      "postal_code" | "base_address" => return Err(locked(field)),
      _ => return Err(unknown(Section::Buyer, field)),
    }
    Ok(())
  }

  fn update_delivery_field(&mut self, field: &str, value: String) -> Result<(), ValidationError> {
    let d = &mut self.delivery;
    match field {
      "recipient_name" => d.recipient_name = value,
      "primary_phone" => d.primary_phone = value,
      "secondary_phone" => d.secondary_phone = value,
      "detail_address" => d.address.detail_address = value,
      "message" => d.message = value,
      "depositor_name" => d.depositor_name = value,
      "delivery_type" => d.delivery_type = value.parse()?,
      "address_type" => d.address_type = value.parse()?,
      "postal_code" | "base_address" => return Err(locked(field)),
      _ => return Err(unknown(Section::Delivery, field)),
    }
    Ok(())
  }

  fn update_discount_field(&mut self, field: &str, value: String) -> Result<(), ValidationError> {
    match field {
      "coupon_code" => self.discount.coupon_code = value,
      "deposit" => {
        let requested = parse_amount(field, &value)?;
        self.apply_deposit(requested);
      }
      "available_deposit" => {
        let available = parse_amount(field, &value)?;
        self.set_available_deposit(available);
      }
      _ => return Err(unknown(Section::Discount, field)),
    }
    Ok(())
  }

  /// Sets postal code and base address of the section's address as one unit.
  pub fn apply_address(
    &mut self,
    section: Section,
    result: &AddressLookupResult,
    clear_detail: bool,
  ) -> CheckoutResult<()> {
    let address: &mut PostalAddress = match section {
      Section::Buyer => &mut self.buyer.address,
      Section::Delivery => &mut self.delivery.address,
      Section::Discount => {
        return Err(
          ValidationError::NoAddress {
            section: section.to_string(),
          }
          .into(),
        )
      }
    };
    address.apply_lookup(result, clear_detail);
    debug!(%section, postal_code = %address.postal_code(), "Address applied from lookup.");
    Ok(())
  }

  pub fn toggle_agreement(&mut self, flag: AgreementFlag) {
    self.agreement.toggle(flag);
  }

  /// True iff both required consents are given. Deposit and coupon are advisory.
  pub fn is_ready_for_payment(&self) -> bool {
    self.agreement.is_complete()
  }

  /// Applies a deposit, silently capped at the available deposit and the
  /// product price. Returns the applied amount.
  pub fn apply_deposit(&mut self, requested: u64) -> u64 {
    let applied = self.discount.apply(requested, self.price_cap());
    if applied != requested {
      debug!(requested, applied, "Deposit clamped.");
    }
    applied
  }

  pub fn set_available_deposit(&mut self, available: u64) {
    let cap = self.price_cap();
    self.discount.set_available(available, cap);
  }

  /// Product price minus the applied deposit, floored at zero.
  pub fn total_amount(&self) -> u64 {
    self
      .product
      .as_ref()
      .map_or(0, |p| self.discount.total_for(p.price))
  }

  fn price_cap(&self) -> u64 {
    self.product.as_ref().map_or(0, |p| p.price)
  }
}

fn locked(field: &str) -> ValidationError {
  ValidationError::AddressLocked {
    field: field.to_string(),
  }
}

fn unknown(section: Section, field: &str) -> ValidationError {
  ValidationError::UnknownField {
    section: section.to_string(),
    field: field.to_string(),
  }
}

fn parse_amount(field: &str, value: &str) -> Result<u64, ValidationError> {
  value.trim().parse::<u64>().map_err(|_| ValidationError::InvalidValue {
    field: field.to_string(),
    value: value.to_string(),
  })
}
