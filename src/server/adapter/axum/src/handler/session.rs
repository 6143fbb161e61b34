/* src/server/adapter/axum/src/handler/session.rs */

use std::sync::Arc;

use axum::extract::State;
use axum::response::Redirect;
use tracing::info;

use super::AppState;

/// Manual retry from the full-page error. Only a failed session re-runs the
/// exchange; the browser lands back on the index page either way.
pub(super) async fn handle_retry(State(state): State<Arc<AppState>>) -> Redirect {
  let next = state.session.retry().await;
  info!(session = next.label(), "session retry requested");
  Redirect::to("/")
}
