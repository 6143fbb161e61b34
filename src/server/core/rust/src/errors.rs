/* src/server/core/rust/src/errors.rs */

use std::fmt;

#[derive(Debug)]
pub struct ForecourtError {
  code: String,
  message: String,
  status: u16,
}

fn default_status(code: &str) -> u16 {
  match code {
    "VALIDATION_ERROR" => 400,
    "UNAUTHORIZED" => 401,
    "NOT_FOUND" => 404,
    "UPSTREAM_ERROR" => 502,
    "UNAVAILABLE" => 503,
    "INTERNAL_ERROR" => 500,
    _ => 500,
  }
}

impl ForecourtError {
  pub fn new(code: impl Into<String>, message: impl Into<String>, status: u16) -> Self {
    Self { code: code.into(), message: message.into(), status }
  }

  pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
    let code = code.into();
    let status = default_status(&code);
    Self { code, message: message.into(), status }
  }

  pub fn validation(msg: impl Into<String>) -> Self {
    Self::with_code("VALIDATION_ERROR", msg)
  }

  pub fn unauthorized(msg: impl Into<String>) -> Self {
    Self::with_code("UNAUTHORIZED", msg)
  }

  pub fn not_found(msg: impl Into<String>) -> Self {
    Self::with_code("NOT_FOUND", msg)
  }

  /// The backend API failed or answered with something unusable.
  pub fn upstream(msg: impl Into<String>) -> Self {
    Self::with_code("UPSTREAM_ERROR", msg)
  }

  /// The dealer session is not ready yet.
  pub fn unavailable(msg: impl Into<String>) -> Self {
    Self::with_code("UNAVAILABLE", msg)
  }

  pub fn internal(msg: impl Into<String>) -> Self {
    Self::with_code("INTERNAL_ERROR", msg)
  }

  pub fn code(&self) -> &str {
    &self.code
  }

  pub fn message(&self) -> &str {
    &self.message
  }

  pub fn status(&self) -> u16 {
    self.status
  }

  /// Whether the same request may succeed later without changes.
  pub fn is_transient(&self) -> bool {
    matches!(self.code.as_str(), "UPSTREAM_ERROR" | "UNAVAILABLE")
  }
}

impl fmt::Display for ForecourtError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}: {}", self.code, self.message)
  }
}

impl std::error::Error for ForecourtError {}

impl From<forecourt_engine::ConfigError> for ForecourtError {
  fn from(err: forecourt_engine::ConfigError) -> Self {
    Self::internal(err.to_string())
  }
}

impl From<forecourt_engine::InvalidFinanceInput> for ForecourtError {
  fn from(err: forecourt_engine::InvalidFinanceInput) -> Self {
    Self::validation(err.to_string())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn default_status_known_codes() {
    assert_eq!(default_status("VALIDATION_ERROR"), 400);
    assert_eq!(default_status("UNAUTHORIZED"), 401);
    assert_eq!(default_status("NOT_FOUND"), 404);
    assert_eq!(default_status("UPSTREAM_ERROR"), 502);
    assert_eq!(default_status("UNAVAILABLE"), 503);
    assert_eq!(default_status("INTERNAL_ERROR"), 500);
  }

  #[test]
  fn default_status_unknown_code() {
    assert_eq!(default_status("CUSTOM_ERROR"), 500);
  }

  #[test]
  fn explicit_status_kept() {
    let err = ForecourtError::new("UPSTREAM_ERROR", "stock api down", 504);
    assert_eq!(err.status(), 504);
    assert_eq!(err.message(), "stock api down");
  }

  #[test]
  fn transient_codes() {
    assert!(ForecourtError::upstream("x").is_transient());
    assert!(ForecourtError::unavailable("x").is_transient());
    assert!(!ForecourtError::validation("x").is_transient());
  }

  #[test]
  fn finance_input_maps_to_validation() {
    let err: ForecourtError = forecourt_engine::InvalidFinanceInput::NonPositiveTerm(0).into();
    assert_eq!(err.status(), 400);
    assert_eq!(err.to_string(), "VALIDATION_ERROR: term must be at least one month, got 0");
  }
}
