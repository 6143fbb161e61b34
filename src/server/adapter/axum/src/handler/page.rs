/* src/server/adapter/axum/src/handler/page.rs */

use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::http::{Method, StatusCode, Uri, header};
use axum::response::{Html, IntoResponse, Response};
use forecourt_engine::{
  DealerData, Metric, NavLink, Page, ResolvedSection, SectionContext, loading_document,
  match_page, navigable_pages, normalize_path, not_found_document, render_document,
  render_section, resolve_sections, section_error_box, session_error_document,
};
use forecourt_server::{ApiClient, ForecourtError, SessionState};
use serde_json::Value;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use super::{AppState, RETRY_PATH};

type LoaderResult = Option<Result<Value, ForecourtError>>;

/// "used-cars" -> "Used cars"
fn nav_label(page_name: &str) -> String {
  let spaced = page_name.replace(['-', '_'], " ");
  let mut chars = spaced.chars();
  match chars.next() {
    Some(first) => first.to_uppercase().chain(chars).collect(),
    None => String::new(),
  }
}

fn nav_entries(pages: &[&Page]) -> Vec<(String, String)> {
  pages.iter().map(|p| (nav_label(&p.page_name), p.path.clone())).collect()
}

/// Run section loaders concurrently. Results are slotted back by section
/// index so the page keeps config order whatever finishes first.
async fn run_loaders(
  api: &ApiClient,
  auth_token: &str,
  resolved: &[ResolvedSection<'_>],
) -> Vec<LoaderResult> {
  let mut slots: Vec<LoaderResult> = Vec::with_capacity(resolved.len());
  let mut join_set = JoinSet::new();

  for (index, entry) in resolved.iter().enumerate() {
    let loader = entry.section().loader.as_ref().filter(|_| entry.is_ready());
    let Some(loader) = loader else {
      slots.push(None);
      continue;
    };
    let pending = ForecourtError::internal(format!("loader {} did not complete", loader.path));
    slots.push(Some(Err(pending)));
    let api = api.clone();
    let path = loader.path.clone();
    let token = auth_token.to_string();
    join_set.spawn(async move { (index, api.fetch_api(&path, &token).await) });
  }

  while let Some(joined) = join_set.join_next().await {
    match joined {
      Ok((index, result)) => slots[index] = Some(result),
      // The slot keeps its "did not complete" error.
      Err(e) => warn!(error = %e, "section loader task failed"),
    }
  }
  slots
}

fn render_sections(
  state: &AppState,
  page: &Page,
  dealer: &DealerData,
  resolved: &[ResolvedSection<'_>],
  loaded: &[LoaderResult],
) -> Vec<String> {
  resolved
    .iter()
    .zip(loaded)
    .map(|(entry, data)| {
      let section = entry.section();
      let outcome = match data {
        Some(Err(e)) => Err(section_error_box(
          &section.catalog_path(&page.page_name),
          &format!("loader failed: {}", e.message()),
        )),
        _ => {
          let ctx = SectionContext {
            dealer,
            page,
            section,
            data: data.as_ref().and_then(|d| d.as_ref().ok()),
            currency_symbol: &state.currency_symbol,
          };
          render_section(entry, &ctx)
        }
      };
      outcome.unwrap_or_else(|error_box| {
        warn!(
          page = %page.page_name,
          section = %section.folder_name,
          variant = %section.variant,
          "section failed"
        );
        state.metrics.record(Metric::count("section.failed"));
        error_box
      })
    })
    .collect()
}

pub(super) async fn handle_page(
  State(state): State<Arc<AppState>>,
  method: Method,
  uri: Uri,
) -> Response {
  if method != Method::GET && method != Method::HEAD {
    return StatusCode::METHOD_NOT_ALLOWED.into_response();
  }

  let session = match state.session.state().await {
    SessionState::Ready(session) => session,
    SessionState::Loading => {
      let headers = [(header::RETRY_AFTER, "2")];
      return (StatusCode::SERVICE_UNAVAILABLE, headers, Html(loading_document())).into_response();
    }
    SessionState::Failed(message) => {
      return (StatusCode::BAD_GATEWAY, Html(session_error_document(&message, RETRY_PATH)))
        .into_response();
    }
  };

  let started = Instant::now();
  let dealer = &session.dealer;
  let path = normalize_path(uri.path());
  let entries = nav_entries(&navigable_pages(&state.config, dealer));
  let nav: Vec<NavLink<'_>> =
    entries.iter().map(|(label, href)| NavLink { label, href }).collect();

  let Some(page) = match_page(&state.config, dealer, path) else {
    state.metrics.record(Metric::count("page.not_found"));
    return (StatusCode::NOT_FOUND, Html(not_found_document(dealer, &nav, path))).into_response();
  };

  let resolved = resolve_sections(page, dealer, &state.registry);
  let loaded = run_loaders(&state.api, &session.auth_token, &resolved).await;
  let sections_html = render_sections(&state, page, dealer, &resolved, &loaded);
  let html = render_document(page, dealer, &nav, &sections_html);

  let elapsed = started.elapsed().as_secs_f64() * 1000.0;
  state.metrics.record(Metric::new("page.render_ms", elapsed));
  debug!(
    page = %page.page_name,
    sections = sections_html.len(),
    elapsed_ms = elapsed,
    "rendered page"
  );
  Html(html).into_response()
}

#[cfg(test)]
mod tests {
  use super::nav_label;

  #[test]
  fn nav_labels() {
    assert_eq!(nav_label("home"), "Home");
    assert_eq!(nav_label("used-cars"), "Used cars");
    assert_eq!(nav_label(""), "");
  }
}
