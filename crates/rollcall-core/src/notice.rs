//! Transient user-facing notices.
//!
//! Every outcome the client shows is a [`Notice`]: a severity and a message
//! that clears itself after a fixed window.

use std::time::Duration;

use serde::Serialize;

/// How long a success notice stays on screen.
pub const SUCCESS_WINDOW: Duration = Duration::from_secs(2);
/// How long a warning or error notice stays on screen.
pub const ALERT_WINDOW: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
  Success,
  Warning,
  Error,
}

impl Severity {
  /// Time before a notice of this severity auto-clears.
  pub fn display_window(&self) -> Duration {
    match self {
      Self::Success => SUCCESS_WINDOW,
      Self::Warning | Self::Error => ALERT_WINDOW,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
  pub severity: Severity,
  pub message:  String,
}

impl Notice {
  pub fn new(severity: Severity, message: impl Into<String>) -> Self {
    Self { severity, message: message.into() }
  }

  /// Shown when the initial class/student load fails and the client falls
  /// back to the demo dataset.
  pub fn load_failed() -> Self {
    Self::new(Severity::Error, "Failed to load data. Using offline mode.")
  }

  pub fn display_window(&self) -> Duration { self.severity.display_window() }
}
