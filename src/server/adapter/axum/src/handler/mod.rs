/* src/server/adapter/axum/src/handler/mod.rs */

mod finance;
mod forms;
mod meta;
mod page;
mod session;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use forecourt_engine::{DealerConfig, MetricsCollector, SectionRegistry};
use forecourt_server::{ApiClient, ForecourtParts, SessionProvider};
use tower_http::trace::TraceLayer;

pub(crate) const RETRY_PATH: &str = "/_forecourt/session/retry";

pub(crate) struct AppState {
  pub config: Arc<DealerConfig>,
  pub registry: Arc<SectionRegistry>,
  pub session: SessionProvider,
  pub api: ApiClient,
  pub metrics: Arc<MetricsCollector>,
  pub currency_symbol: String,
}

pub(crate) fn build_router(parts: ForecourtParts) -> Router {
  let state = Arc::new(AppState {
    config: parts.config,
    registry: parts.registry,
    session: parts.session,
    api: parts.api,
    metrics: parts.metrics,
    currency_symbol: parts.currency_symbol,
  });

  // Everything outside /_forecourt is a dealer page; the page handler does
  // its own route matching against the dealer config.
  Router::new()
    .route("/_forecourt/health", get(meta::handle_health))
    .route("/_forecourt/pages", get(meta::handle_pages))
    .route("/_forecourt/metrics", get(meta::handle_metrics))
    .route("/_forecourt/finance/quote", post(finance::handle_quote))
    .route(RETRY_PATH, post(session::handle_retry))
    .route(
      "/_forecourt/forms/{kind}",
      post(forms::handle_form).layer(DefaultBodyLimit::max(forms::MAX_UPLOAD_BYTES)),
    )
    .fallback(page::handle_page)
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}
