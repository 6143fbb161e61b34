/* src/cli/core/src/serve.rs */

use std::path::Path;
use std::sync::Arc;

use anyhow::{Result, anyhow};
use forecourt_engine::MetricsCollector;
use forecourt_server::{ApiClient, ForecourtServer, SessionProvider};
use forecourt_server_axum::IntoAxumRouter;
use tracing::info;

use crate::config::{ForecourtConfig, load_dealer_config};
use crate::ui;

async fn shutdown_signal() {
  if tokio::signal::ctrl_c().await.is_ok() {
    info!("shutdown requested");
  }
}

fn log_metrics_summary(metrics: &MetricsCollector) {
  for (name, stats) in metrics.summary() {
    info!(
      metric = %name,
      count = stats.count,
      mean = stats.mean,
      min = stats.min,
      max = stats.max,
      "metrics summary"
    );
  }
}

pub async fn run_serve(config: &ForecourtConfig, base_dir: &Path) -> Result<()> {
  let dealer_config = load_dealer_config(config, base_dir)?;
  let settings = config.session_settings()?;

  ui::banner("serve");
  ui::arrow(&format!("{} pages configured", dealer_config.pages.len()));
  ui::arrow(&format!("api {}", settings.base_url));

  let api = ApiClient::new(settings.base_url);
  let session = SessionProvider::new(api.clone(), settings.token, settings.claim);
  let metrics = Arc::new(MetricsCollector::new());
  let server = ForecourtServer::new(dealer_config, api, session)
    .metrics(metrics.clone())
    .currency_symbol(config.finance.currency_symbol.as_str());

  server
    .serve(&config.listen_addr(), shutdown_signal())
    .await
    .map_err(|e| anyhow!("server error: {e}"))?;

  log_metrics_summary(&metrics);
  Ok(())
}
