//! Error types for the fallible edges of the crate.
//!
//! Searching, filtering, scoring and zone lookup never fail. Errors only
//! come from loading data, reading configuration, talking to the clinic API
//! and persisting the error log.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
  #[error("i/o error: {0}")]
  Io(#[from] std::io::Error),

  #[error("invalid json: {0}")]
  Json(#[from] serde_json::Error),

  #[error("failed to parse config: {0}")]
  ConfigParse(#[from] toml::de::Error),

  #[error("invalid config: {0}")]
  Config(String),

  #[error(transparent)]
  Api(#[from] ApiError),

  #[error("page size {requested} is not one of {allowed:?}")]
  InvalidPageSize { requested: usize, allowed: Vec<usize> },
}

/// Failures reported by the clinic search API.
#[derive(Debug, Error)]
pub enum ApiError {
  #[cfg(feature = "api")]
  #[error("request failed: {0}")]
  Http(#[from] reqwest::Error),

  #[error("API key required")]
  ApiKeyRequired,

  #[error("Invalid API key")]
  InvalidApiKey,

  #[error("Rate limit exceeded")]
  RateLimited,

  #[error("unexpected status {0}")]
  Status(u16),
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_api_errors_display_user_messages() {
    assert_eq!(ApiError::ApiKeyRequired.to_string(), "API key required");
    assert_eq!(ApiError::RateLimited.to_string(), "Rate limit exceeded");
    let err: Error = ApiError::InvalidApiKey.into();
    assert_eq!(err.to_string(), "Invalid API key");
  }

  #[test]
  fn test_page_size_message_lists_options() {
    let err = Error::InvalidPageSize {
      requested: 30,
      allowed: vec![25, 50, 100],
    };
    assert_eq!(err.to_string(), "page size 30 is not one of [25, 50, 100]");
  }
}
