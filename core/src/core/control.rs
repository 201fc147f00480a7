// checkout_flow/src/core/control.rs

//! Signals for controlling pipeline flow and the outcome of a pipeline run.

/// Returned by a step handler to tell the pipeline whether to keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineControl {
  /// Run the remaining handlers of this step, then the following steps.
  Continue,
  /// Halt the pipeline right here. The attempt flow uses this once an attempt
  /// has reached a terminal outcome (cancelled, failed) before the last step.
  Stop,
}

/// Outcome of a full pipeline execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineResult {
  /// Every step ran to completion.
  Completed,
  /// A handler returned `PipelineControl::Stop`.
  Stopped,
}
