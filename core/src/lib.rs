// checkout_flow/src/lib.rs

//! Checkout payment flow for a single-product storefront.
//!
//! A `CheckoutSession` holds what the buyer typed. `PaymentOrchestrator`
//! turns a session into one payment attempt:
//!  - validates the submission,
//!  - opens the payment gateway with a fresh merchant order id,
//!  - classifies whatever the gateway calls back with,
//!  - confirms a successful payment with the order backend exactly once.
//!
//! The attempt itself runs as a `Pipeline` of named steps with before/on/after
//! hooks, sharing state through `ContextData`.

pub mod attempt;
pub mod backend;
pub mod classifier;
pub mod config;
pub mod core;
pub mod error;
pub mod gateway;
pub mod models;
pub mod orchestrator;
pub mod pipeline;
pub mod platform;
pub mod session;

// --- Re-exports for the Public API ---

pub use crate::core::{ContextData, Handler, PipelineControl, PipelineResult, StepDef};
pub use crate::pipeline::Pipeline;

pub use crate::error::{CheckoutError, CheckoutResult, FlowError, ValidationError};

pub use crate::attempt::{MerchantUidGenerator, PaymentAttempt};
pub use crate::backend::{BackendConfirmation, BackendError, PaymentConfirmation, RestBackend, UserDirectory};
pub use crate::classifier::{classify, GatewayOutcome};
pub use crate::config::{CheckoutConfig, Environment};
pub use crate::gateway::{
  CallbackDelivery, GatewayCallback, GatewayError, GatewayPayload, GatewayScript, PaymentData, PaymentGateway,
  ScriptedGateway,
};
pub use crate::models::*;
pub use crate::orchestrator::{AttemptOutcome, CheckoutState, PaymentOrchestrator};
pub use crate::platform::Platform;
pub use crate::session::{CheckoutSession, Section};
