//! Error types and axum `IntoResponse` implementation.

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
  /// Usually a missing or unreadable article stub.
  #[error("content error: {0}")]
  Io(#[from] std::io::Error),
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    tracing::error!("request failed: {self}");
    (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
  }
}
