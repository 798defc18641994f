//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::QueryRejection,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thaigeo_core::geo::Level;
use thaigeo_import::{ImportError, ResetError};
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("conflict: {0}")]
  Conflict(String),

  /// The upstream source could not be fetched; the import was aborted.
  #[error("{message}")]
  Upstream {
    phase:   Level,
    cause:   &'static str,
    message: String,
  },

  /// A table could not be cleared; later tables were left alone.
  #[error("{message}")]
  Reset { table: Level, message: String },

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<QueryRejection> for ApiError {
  fn from(e: QueryRejection) -> Self { ApiError::BadRequest(e.body_text()) }
}

impl From<ImportError> for ApiError {
  fn from(e: ImportError) -> Self {
    let message = e.to_string();
    match e {
      ImportError::Fetch { phase, source } => ApiError::Upstream {
        phase,
        cause: source.cause(),
        message,
      },
      ImportError::AlreadyRunning => ApiError::Conflict(message),
    }
  }
}

impl From<ResetError> for ApiError {
  fn from(e: ResetError) -> Self {
    let message = e.to_string();
    match e {
      ResetError::Delete { table, .. } => ApiError::Reset { table, message },
      ResetError::Busy => ApiError::Conflict(message),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let message = self.to_string();
    match self {
      ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))),
      ApiError::Conflict(_) => (StatusCode::CONFLICT, Json(json!({ "error": message }))),
      ApiError::Upstream { phase, cause, .. } => (
        StatusCode::BAD_GATEWAY,
        Json(json!({ "error": message, "phase": phase, "cause": cause })),
      ),
      ApiError::Reset { table, .. } => {
        tracing::error!(%table, error = %message, "clear-data failed");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          Json(json!({ "error": message, "table": table.table() })),
        )
      }
      ApiError::Store(_) => {
        tracing::error!(error = %message, "store error");
        (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": message })))
      }
    }
    .into_response()
  }
}
