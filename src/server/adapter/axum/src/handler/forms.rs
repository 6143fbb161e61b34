/* src/server/adapter/axum/src/handler/forms.rs */

use std::sync::Arc;

use axum::extract::{FromRequest, Multipart, Path, Query, Request, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use forecourt_engine::{FieldError, FormKind, Metric};
use forecourt_server::{ForecourtError, FormField};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tracing::info;

use super::AppState;
use crate::error::AxumError;

const MAX_JSON_BODY: usize = 64 * 1024;
pub(super) const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;
const PHOTO_FIELD: &str = "photos";

#[derive(Deserialize, Default)]
#[serde(default)]
pub(super) struct FormParams {
  step: Option<u8>,
}

/// A parsed submission: the JSON view used for validation, plus the raw
/// multipart fields to forward when files were attached.
struct Submission {
  body: Value,
  files: Vec<FormField>,
  texts: Vec<FormField>,
}

/// Multipart text values are strings; the few non-string form fields are coerced.
fn text_value(name: &str, value: &str) -> Value {
  match name {
    "mileage" => value.trim().parse::<u64>().map_or_else(|_| Value::from(value), Value::from),
    "acceptTerms" => Value::Bool(matches!(value, "true" | "on" | "1")),
    _ => Value::from(value),
  }
}

async fn read_multipart(mut multipart: Multipart) -> Result<Submission, ForecourtError> {
  let mut body = Map::new();
  let mut files = Vec::new();
  let mut texts = Vec::new();
  while let Some(field) =
    multipart.next_field().await.map_err(|e| ForecourtError::validation(e.to_string()))?
  {
    let name = field.name().unwrap_or_default().to_string();
    match field.file_name().map(str::to_string) {
      Some(file_name) => {
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(|e| ForecourtError::validation(e.to_string()))?;
        files.push(FormField::File { name, file_name, content_type, bytes: bytes.to_vec() });
      }
      None => {
        let value = field.text().await.map_err(|e| ForecourtError::validation(e.to_string()))?;
        body.insert(name.clone(), text_value(&name, &value));
        texts.push(FormField::Text { name, value });
      }
    }
  }
  let photos = files
    .iter()
    .filter(|f| matches!(f, FormField::File { name, .. } if name == PHOTO_FIELD))
    .count();
  body.insert("photoCount".into(), Value::from(photos));
  Ok(Submission { body: Value::Object(body), files, texts })
}

async fn read_submission(request: Request) -> Result<Submission, ForecourtError> {
  let is_multipart = request
    .headers()
    .get(header::CONTENT_TYPE)
    .and_then(|v| v.to_str().ok())
    .is_some_and(|ct| ct.starts_with("multipart/form-data"));
  if is_multipart {
    let multipart = Multipart::from_request(request, &())
      .await
      .map_err(|e| ForecourtError::validation(e.body_text()))?;
    return read_multipart(multipart).await;
  }
  let bytes = axum::body::to_bytes(request.into_body(), MAX_JSON_BODY)
    .await
    .map_err(|e| ForecourtError::validation(e.to_string()))?;
  let body = serde_json::from_slice(&bytes).map_err(|e| ForecourtError::validation(e.to_string()))?;
  Ok(Submission { body, files: Vec::new(), texts: Vec::new() })
}

fn rejected(errors: &[FieldError]) -> Response {
  let body = json!({
    "ok": false,
    "error": { "code": "VALIDATION_ERROR", "message": errors[0].message, "transient": false },
    "errors": errors,
  });
  (StatusCode::BAD_REQUEST, axum::Json(body)).into_response()
}

/// Validate one step (`?step=N`) or the whole form. Earlier steps only
/// report whether the user may move on; the final step or a whole-form
/// submission is forwarded to the backend.
pub(super) async fn handle_form(
  State(state): State<Arc<AppState>>,
  Path(slug): Path<String>,
  Query(params): Query<FormParams>,
  request: Request,
) -> Result<Response, AxumError> {
  let kind = FormKind::from_slug(&slug)
    .ok_or_else(|| ForecourtError::not_found(format!("unknown form \"{slug}\"")))?;
  let session = state
    .session
    .session()
    .await
    .ok_or_else(|| ForecourtError::unavailable("dealer session is not ready"))?;

  let submission = read_submission(request).await?;
  // The final step re-checks every step before anything is forwarded.
  let validate_step = params.step.filter(|s| *s != kind.steps());
  let errors = kind
    .validate_json(&submission.body, validate_step)
    .map_err(|e| ForecourtError::validation(e.to_string()))?;
  if !errors.is_empty() {
    state.metrics.record(Metric::count("form.rejected"));
    return Ok(rejected(&errors));
  }

  if let Some(step) = params.step.filter(|s| *s < kind.steps()) {
    return Ok(axum::Json(json!({ "ok": true, "step": step, "next": step + 1 })).into_response());
  }

  let result = if submission.files.is_empty() {
    state.api.post_api(kind.endpoint(), &submission.body, Some(&session.auth_token)).await?
  } else {
    let mut fields = submission.texts;
    fields.extend(submission.files);
    state.api.post_form_data_api(kind.endpoint(), fields, &session.auth_token).await?
  };
  info!(form = %slug, "form submitted");
  state.metrics.record(Metric::count("form.submitted"));
  Ok(axum::Json(json!({ "ok": true, "data": result })).into_response())
}
