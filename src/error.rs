//! Error type delivered through the `error` channel of every publisher.
//!
//! Errors always surface at the subscriber or collector boundary; no operator
//! retries or swallows them.

use std::time::Duration;

use thiserror::Error;

/// Errors produced by publishers and collectors.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RxError {
  /// The blocking collector's deadline passed before the publisher completed.
  #[error("no completion within {timeout:?}")]
  Timeout {
    /// The deadline the collector waited for.
    timeout: Duration,
  },

  /// An emission procedure failed.
  #[error("emission failed: {message}")]
  Emission {
    /// What went wrong, as reported by the procedure.
    message: String,
  },
}

impl RxError {
  /// Shorthand for [`RxError::Emission`].
  pub fn emission(message: impl Into<String>) -> Self { RxError::Emission { message: message.into() } }

  /// Returns a short stable label (snake_case) for use in logs.
  ///
  /// ```
  /// use rxflux::RxError;
  /// use std::time::Duration;
  ///
  /// let err = RxError::Timeout { timeout: Duration::from_secs(1) };
  /// assert_eq!(err.as_label(), "collect_timeout");
  /// ```
  pub fn as_label(&self) -> &'static str {
    match self {
      RxError::Timeout { .. } => "collect_timeout",
      RxError::Emission { .. } => "emission_failed",
    }
  }

  /// `true` for [`RxError::Timeout`].
  pub fn is_timeout(&self) -> bool { matches!(self, RxError::Timeout { .. }) }
}
