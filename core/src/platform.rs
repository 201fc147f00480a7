// checkout_flow/src/platform.rs
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where the payment window opens. Mobile browsers leave the page and come
/// back through a redirect, desktop browsers get a popup and a callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
  Mobile,
  Desktop,
}

const MOBILE_MARKERS: &[&str] = &[
  "android",
  "iphone",
  "ipad",
  "ipod",
  "blackberry",
  "iemobile",
  "opera mini",
  "mobile",
];

impl Platform {
  /// Sniffs the platform from a browser user-agent string.
  pub fn from_user_agent(user_agent: &str) -> Self {
    let ua = user_agent.to_ascii_lowercase();
    if MOBILE_MARKERS.iter().any(|marker| ua.contains(marker)) {
      Platform::Mobile
    } else {
      Platform::Desktop
    }
  }

  pub fn is_mobile(self) -> bool {
    self == Platform::Mobile
  }
}

impl fmt::Display for Platform {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Platform::Mobile => f.write_str("mobile"),
      Platform::Desktop => f.write_str("desktop"),
    }
  }
}
