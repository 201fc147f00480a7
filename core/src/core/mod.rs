pub mod context;
pub mod context_data;
pub mod control;
pub mod step;

// Re-export key types for the pipeline module and lib.rs
pub use context::Handler;
pub use context_data::ContextData;
pub use control::{PipelineControl, PipelineResult};
pub use step::StepDef;
