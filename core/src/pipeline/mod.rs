// checkout_flow/src/pipeline/mod.rs

//! The step pipeline: definition, hook registration and execution.

pub mod definition;
pub mod execution;
pub mod hooks;

pub use definition::Pipeline;
