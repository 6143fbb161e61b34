/* src/server/adapter/axum/src/handler/finance.rs */

use std::sync::Arc;

use axum::extract::{Query, State};
use forecourt_engine::{FinanceQuote, Metric, QuoteSummary, quote, quote_checked};
use forecourt_server::ForecourtError;
use serde::Deserialize;

use super::AppState;
use crate::error::AxumError;

#[derive(Deserialize, Default)]
#[serde(default)]
pub(super) struct QuoteParams {
  strict: bool,
}

/// Finance quote. Degenerate input yields zeros unless `?strict=true`.
pub(super) async fn handle_quote(
  State(state): State<Arc<AppState>>,
  Query(params): Query<QuoteParams>,
  body: axum::body::Bytes,
) -> Result<axum::Json<QuoteSummary>, AxumError> {
  let mut request: FinanceQuote =
    serde_json::from_slice(&body).map_err(|e| ForecourtError::validation(e.to_string()))?;
  if request.currency_symbol.is_none() {
    request.currency_symbol = Some(state.currency_symbol.clone());
  }

  let summary = if params.strict {
    quote_checked(&request).map_err(ForecourtError::from)?
  } else {
    quote(&request)
  };
  state.metrics.record(Metric::count("finance.quote"));
  Ok(axum::Json(summary))
}
