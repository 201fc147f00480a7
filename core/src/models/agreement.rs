// checkout_flow/src/models/agreement.rs
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgreementFlag {
  All,
  Privacy,
  OrderTerms,
}

/// Required consents. `all` is derived: true iff both consents are true.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgreementState {
  privacy: bool,
  order_terms: bool,
  all: bool,
}

impl AgreementState {
  pub fn privacy(&self) -> bool {
    self.privacy
  }

  pub fn order_terms(&self) -> bool {
    self.order_terms
  }

  pub fn all(&self) -> bool {
    self.all
  }

  pub fn toggle(&mut self, flag: AgreementFlag) {
    match flag {
      AgreementFlag::All => {
        let next = !self.all;
        self.privacy = next;
        self.order_terms = next;
      }
      AgreementFlag::Privacy => self.privacy = !self.privacy,
      AgreementFlag::OrderTerms => self.order_terms = !self.order_terms,
    }
    self.all = self.privacy && self.order_terms;
  }

  pub fn is_complete(&self) -> bool {
    self.privacy && self.order_terms
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn all_flag_sets_and_clears_both() {
    let mut a = AgreementState::default();
    a.toggle(AgreementFlag::All);
    assert!(a.privacy() && a.order_terms() && a.all());
    a.toggle(AgreementFlag::All);
    assert!(!a.privacy() && !a.order_terms() && !a.all());
  }

  #[test]
  fn single_flags_recompute_all_without_forcing_it() {
    let mut a = AgreementState::default();
    a.toggle(AgreementFlag::Privacy);
    assert!(!a.all());
    a.toggle(AgreementFlag::OrderTerms);
    assert!(a.all());
    a.toggle(AgreementFlag::Privacy);
    assert!(!a.all());
    assert!(a.order_terms());
  }

  #[test]
  fn all_from_partial_state_turns_everything_on() {
    let mut a = AgreementState::default();
    a.toggle(AgreementFlag::OrderTerms);
    a.toggle(AgreementFlag::All);
    assert!(a.is_complete());
  }
}
