/* src/server/core/rust/src/api.rs */

//! Thin REST client for the dealership backend.

use reqwest::StatusCode;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tracing::debug;

use crate::errors::ForecourtError;

/// One multipart field for [`ApiClient::post_form_data_api`].
#[derive(Debug, Clone)]
pub enum FormField {
  Text { name: String, value: String },
  File { name: String, file_name: String, content_type: Option<String>, bytes: Vec<u8> },
}

#[derive(Clone)]
pub struct ApiClient {
  base_url: String,
  http: reqwest::Client,
}

impl ApiClient {
  pub fn new(base_url: impl Into<String>) -> Self {
    Self::with_client(base_url, reqwest::Client::new())
  }

  pub fn with_client(base_url: impl Into<String>, http: reqwest::Client) -> Self {
    Self { base_url: base_url.into(), http }
  }

  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  pub fn url(&self, path: &str) -> String {
    format!("{}/{}", self.base_url.trim_end_matches('/'), path.trim_start_matches('/'))
  }

  /// GET with bearer auth.
  pub async fn fetch_api(&self, path: &str, auth_token: &str) -> Result<Value, ForecourtError> {
    let url = self.url(path);
    debug!(%url, "GET");
    let resp =
      self.http.get(&url).bearer_auth(auth_token).send().await.map_err(|e| transport(&url, &e))?;
    read_json(&url, resp).await
  }

  /// POST a JSON body; auth is optional because the token exchange itself is unauthenticated.
  pub async fn post_api(
    &self,
    path: &str,
    body: &Value,
    auth_token: Option<&str>,
  ) -> Result<Value, ForecourtError> {
    let url = self.url(path);
    debug!(%url, "POST");
    let mut req = self.http.post(&url).json(body);
    if let Some(token) = auth_token {
      req = req.bearer_auth(token);
    }
    let resp = req.send().await.map_err(|e| transport(&url, &e))?;
    read_json(&url, resp).await
  }

  pub async fn post_form_data_api(
    &self,
    path: &str,
    fields: Vec<FormField>,
    auth_token: &str,
  ) -> Result<Value, ForecourtError> {
    let url = self.url(path);
    let mut form = Form::new();
    for field in fields {
      form = match field {
        FormField::Text { name, value } => form.text(name, value),
        FormField::File { name, file_name, content_type, bytes } => {
          let mut part = Part::bytes(bytes).file_name(file_name);
          if let Some(ct) = content_type {
            part = part
              .mime_str(&ct)
              .map_err(|e| ForecourtError::validation(format!("invalid content type {ct}: {e}")))?;
          }
          form.part(name, part)
        }
      };
    }
    debug!(%url, "POST multipart");
    let resp = self
      .http
      .post(&url)
      .bearer_auth(auth_token)
      .multipart(form)
      .send()
      .await
      .map_err(|e| transport(&url, &e))?;
    read_json(&url, resp).await
  }
}

fn transport(url: &str, err: &reqwest::Error) -> ForecourtError {
  ForecourtError::upstream(format!("request to {url} failed: {err}"))
}

/// Map a non-2xx status onto the error taxonomy; parse the body as JSON otherwise.
async fn read_json(url: &str, resp: reqwest::Response) -> Result<Value, ForecourtError> {
  let status = resp.status();
  if !status.is_success() {
    let detail = resp.text().await.unwrap_or_default();
    let msg = if detail.is_empty() {
      format!("{url} returned HTTP {status}")
    } else {
      format!("{url} returned HTTP {status}: {detail}")
    };
    return Err(match status {
      StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ForecourtError::unauthorized(msg),
      StatusCode::NOT_FOUND => ForecourtError::not_found(msg),
      StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => ForecourtError::validation(msg),
      _ => ForecourtError::upstream(msg),
    });
  }
  let bytes = resp.bytes().await.map_err(|e| transport(url, &e))?;
  if bytes.is_empty() {
    return Ok(Value::Null);
  }
  serde_json::from_slice(&bytes)
    .map_err(|e| ForecourtError::upstream(format!("invalid JSON from {url}: {e}")))
}
