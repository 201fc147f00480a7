// checkout_flow/src/core/step.rs

/// A named step of a pipeline.
///
/// An optional step without handlers is skipped; a required step without
/// handlers fails the run with `FlowError::HandlerMissing`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepDef {
  pub name: String,
  pub optional: bool,
}

impl StepDef {
  pub fn required(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      optional: false,
    }
  }

  pub fn optional(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      optional: true,
    }
  }
}
