//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("unauthorized")]
  Unauthorized,

  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<chirp_core::Error> for ApiError {
  fn from(e: chirp_core::Error) -> Self {
    use chirp_core::Error as E;
    match e {
      E::ConstraintViolation(_) => ApiError::Conflict(e.to_string()),
      E::SelfFollow
      | E::Empty { .. }
      | E::TooLong { .. }
      | E::InvalidCharacter { .. } => ApiError::BadRequest(e.to_string()),
      E::Store(inner) => ApiError::Store(inner),
    }
  }
}

/// Lift a backend error through the core taxonomy, so constraint violations
/// still map to 409.
pub(crate) fn store_err<E: Into<chirp_core::Error>>(e: E) -> ApiError { ApiError::from(e.into()) }

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized".to_owned()),
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store failure");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
