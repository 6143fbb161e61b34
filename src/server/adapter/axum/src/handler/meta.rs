/* src/server/adapter/axum/src/handler/meta.rs */

use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use forecourt_engine::{navigable_pages, render_meta_template};
use forecourt_server::{ForecourtError, SessionState};
use serde::Serialize;

use super::AppState;
use crate::error::AxumError;

pub(super) async fn handle_health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  let session = state.session.state().await;
  axum::Json(serde_json::json!({
    "status": "ok",
    "session": session.label(),
    "version": env!("CARGO_PKG_VERSION"),
  }))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PageSummary {
  page_name: String,
  path: String,
  title: String,
}

/// Navigable pages for the current dealer, in config order.
pub(super) async fn handle_pages(
  State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AxumError> {
  let session = match state.session.state().await {
    SessionState::Ready(session) => session,
    SessionState::Loading => {
      return Err(ForecourtError::unavailable("dealer session is still loading").into());
    }
    SessionState::Failed(message) => return Err(ForecourtError::upstream(message).into()),
  };
  let pages: Vec<PageSummary> = navigable_pages(&state.config, &session.dealer)
    .into_iter()
    .map(|page| PageSummary {
      page_name: page.page_name.clone(),
      path: page.path.clone(),
      title: render_meta_template(&page.title, &session.dealer),
    })
    .collect();
  Ok(axum::Json(pages))
}

pub(super) async fn handle_metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  axum::Json(state.metrics.summary())
}
