// checkout_flow/src/models/mod.rs
pub mod address;
pub mod agreement;
pub mod buyer;
pub mod delivery;
pub mod discount;
pub mod product;
pub mod receipt;

pub use address::{AddressLookupResult, PostalAddress};
pub use agreement::{AgreementFlag, AgreementState};
pub use buyer::{BuyerProfile, UserProfile, PLACEHOLDER_BUYER_NAME, PLACEHOLDER_BUYER_PHONE};
pub use delivery::{AddressType, DeliveryInfo, DeliveryType};
pub use discount::DiscountState;
pub use product::Product;
pub use receipt::OrderReceipt;
