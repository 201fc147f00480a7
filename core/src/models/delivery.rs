// checkout_flow/src/models/delivery.rs
use super::address::PostalAddress;
use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryType {
  #[default]
  Domestic,
  Overseas,
}

impl FromStr for DeliveryType {
  type Err = ValidationError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "domestic" => Ok(DeliveryType::Domestic),
      "overseas" => Ok(DeliveryType::Overseas),
      _ => Err(ValidationError::InvalidValue {
        field: "delivery_type".to_string(),
        value: s.to_string(),
      }),
    }
  }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressType {
  #[default]
  Home,
  Company,
  Recent,
  List,
  New,
}

impl FromStr for AddressType {
  type Err = ValidationError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "home" => Ok(AddressType::Home),
      "company" => Ok(AddressType::Company),
      "recent" => Ok(AddressType::Recent),
      "list" => Ok(AddressType::List),
      "new" => Ok(AddressType::New),
      _ => Err(ValidationError::InvalidValue {
        field: "address_type".to_string(),
        value: s.to_string(),
      }),
    }
  }
}

/// Recipient and shipping details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryInfo {
  pub recipient_name: String,
  pub primary_phone: String,
  pub secondary_phone: String,
  pub address: PostalAddress,
  pub message: String,
  /// Name on the transfer when paying by bank deposit.
  pub depositor_name: String,
  pub delivery_type: DeliveryType,
  pub address_type: AddressType,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_enum_names_case_insensitively() {
    assert_eq!("Overseas".parse::<DeliveryType>().unwrap(), DeliveryType::Overseas);
    assert_eq!(" company ".parse::<AddressType>().unwrap(), AddressType::Company);
    assert!(matches!(
      "moon".parse::<DeliveryType>(),
      Err(ValidationError::InvalidValue { .. })
    ));
  }
}
