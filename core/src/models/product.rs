// checkout_flow/src/models/product.rs
use serde::{Deserialize, Serialize};

/// A product being checked out. Prices are in the minor currency unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
  pub id: String,
  pub name: String,
  pub price: u64,
  pub category: String,
}

impl Product {
  pub fn new(id: impl Into<String>, name: impl Into<String>, price: u64, category: impl Into<String>) -> Self {
    Self {
      id: id.into(),
      name: name.into(),
      price,
      category: category.into(),
    }
  }
}
