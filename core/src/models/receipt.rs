// checkout_flow/src/models/receipt.rs
use serde::{Deserialize, Serialize};

/// The backend's record of a confirmed payment, handed back to the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReceipt {
  pub order_number: String,
  pub product_name: String,
  pub total_amount: u64,
}
