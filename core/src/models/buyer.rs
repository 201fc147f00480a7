// checkout_flow/src/models/buyer.rs
use super::address::PostalAddress;
use serde::{Deserialize, Serialize};

pub const PLACEHOLDER_BUYER_NAME: &str = "Customer";
pub const PLACEHOLDER_BUYER_PHONE: &str = "010-0000-0000";

/// The orderer as entered on the checkout screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuyerProfile {
  pub name: String,
  pub email: String,
  pub phone: String,
  pub address: PostalAddress,
}

impl BuyerProfile {
  /// Profile used when the user record could not be fetched.
  pub fn placeholder() -> Self {
    Self {
      name: PLACEHOLDER_BUYER_NAME.to_string(),
      phone: PLACEHOLDER_BUYER_PHONE.to_string(),
      ..Default::default()
    }
  }

  pub fn has_email(&self) -> bool {
    !self.email.trim().is_empty()
  }
}

/// `GET /users/{id}` response body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
  pub id: String,
  #[serde(default)]
  pub name: Option<String>,
  #[serde(default)]
  pub email: Option<String>,
  #[serde(default)]
  pub phone: Option<String>,
}

impl From<UserProfile> for BuyerProfile {
  fn from(user: UserProfile) -> Self {
    let non_blank = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
    BuyerProfile {
      name: non_blank(user.name).unwrap_or_else(|| PLACEHOLDER_BUYER_NAME.to_string()),
      email: non_blank(user.email).unwrap_or_default(),
      phone: non_blank(user.phone).unwrap_or_else(|| PLACEHOLDER_BUYER_PHONE.to_string()),
      address: PostalAddress::default(),
    }
  }
}
