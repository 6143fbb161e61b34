/* src/server/adapter/axum/src/error.rs */

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use forecourt_server::ForecourtError;

/// Newtype wrapper to implement `IntoResponse` for `ForecourtError`;
/// the orphan rule forbids implementing it on the foreign type directly.
pub(crate) struct AxumError(pub ForecourtError);

impl IntoResponse for AxumError {
  fn into_response(self) -> Response {
    let err = self.0;
    let status = StatusCode::from_u16(err.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = serde_json::json!({
      "ok": false,
      "error": {
        "code": err.code(),
        "message": err.message(),
        "transient": err.is_transient(),
      }
    });
    (status, axum::Json(body)).into_response()
  }
}

impl From<ForecourtError> for AxumError {
  fn from(err: ForecourtError) -> Self {
    Self(err)
  }
}
