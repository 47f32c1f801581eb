use reqwest::StatusCode;
use thiserror::Error;

/// Failures of calls against the notes API.
///
/// None of these are retried; callers turn them into notifications.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
  /// No response at all (connect failure, timeout, reset)
  #[error("network error: {0}")]
  Network(String),

  #[error("not authorized, check NOTEHUB_TOKEN")]
  Auth,

  /// 4xx other than 401/404, usually a rejected payload
  #[error("rejected ({status}): {message}")]
  Validation { status: u16, message: String },

  #[error("not found: {0}")]
  NotFound(String),

  #[error("server error ({status}): {message}")]
  Server { status: u16, message: String },

  /// 2xx with a body we could not make sense of
  #[error("unexpected response: {0}")]
  Decode(String),
}

impl ApiError {
  /// Map a non-success status to the error taxonomy.
  pub fn from_status(status: StatusCode, message: String) -> Self {
    match status {
      StatusCode::UNAUTHORIZED => ApiError::Auth,
      StatusCode::NOT_FOUND => ApiError::NotFound(message),
      s if s.is_server_error() => ApiError::Server {
        status: s.as_u16(),
        message,
      },
      s => ApiError::Validation {
        status: s.as_u16(),
        message,
      },
    }
  }
}

impl From<reqwest::Error> for ApiError {
  fn from(e: reqwest::Error) -> Self {
    ApiError::Network(e.to_string())
  }
}
