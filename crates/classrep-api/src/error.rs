//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use classrep_core::Error as CoreError;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error(transparent)]
  Core(#[from] CoreError),

  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),
}

impl ApiError {
  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::Core(e) => match e {
        CoreError::NotFound { .. } => StatusCode::NOT_FOUND,
        CoreError::PreconditionFailed(_) => StatusCode::PRECONDITION_FAILED,
        CoreError::Unauthenticated => StatusCode::UNAUTHORIZED,
        CoreError::Invalid { .. } => StatusCode::BAD_REQUEST,
        CoreError::PartialSequenceFailure { .. } => StatusCode::CONFLICT,
        CoreError::Store(_) | CoreError::RemoteWriteFailed(_) => {
          StatusCode::INTERNAL_SERVER_ERROR
        }
      },
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      tracing::error!(error = %self, "request failed");
    }

    // Backend error text stays in the log.
    let body = match &self {
      ApiError::Core(CoreError::PartialSequenceFailure { step, source }) => {
        tracing::warn!(%step, error = %source, "activation needs reload");
        json!({
          "error": format!("activation stopped at step \"{step}\""),
          "reload": true,
        })
      }
      _ if status.is_server_error() => json!({ "error": "internal server error" }),
      _ => json!({ "error": self.to_string() }),
    };

    let mut res = (status, Json(body)).into_response();
    if status == StatusCode::UNAUTHORIZED {
      res.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        HeaderValue::from_static("Basic realm=\"classrep\""),
      );
    }
    res
  }
}
