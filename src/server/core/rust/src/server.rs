/* src/server/core/rust/src/server.rs */

use std::sync::Arc;

use forecourt_engine::finance::DEFAULT_CURRENCY_SYMBOL;
use forecourt_engine::{DealerConfig, MetricsCollector, SectionRegistry};

use crate::api::ApiClient;
use crate::catalog::builtin_sections;
use crate::session::SessionProvider;

/// Framework-agnostic parts extracted from `ForecourtServer`.
/// Adapter crates consume this to build framework-specific routers.
pub struct ForecourtParts {
  pub config: Arc<DealerConfig>,
  pub registry: Arc<SectionRegistry>,
  pub session: SessionProvider,
  pub api: ApiClient,
  pub metrics: Arc<MetricsCollector>,
  pub currency_symbol: String,
}

pub struct ForecourtServer {
  config: DealerConfig,
  api: ApiClient,
  session: SessionProvider,
  registry: SectionRegistry,
  metrics: Option<Arc<MetricsCollector>>,
  currency_symbol: String,
}

impl ForecourtServer {
  /// Starts with the built-in section catalog.
  pub fn new(config: DealerConfig, api: ApiClient, session: SessionProvider) -> Self {
    Self {
      config,
      api,
      session,
      registry: builtin_sections(),
      metrics: None,
      currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
    }
  }

  /// Add sections on top of the built-ins; clashing variants are replaced.
  pub fn sections(mut self, registry: SectionRegistry) -> Self {
    self.registry = self.registry.merge(registry);
    self
  }

  /// Share a collector with the caller, e.g. to log its summary at shutdown.
  pub fn metrics(mut self, metrics: Arc<MetricsCollector>) -> Self {
    self.metrics = Some(metrics);
    self
  }

  pub fn currency_symbol(mut self, symbol: impl Into<String>) -> Self {
    self.currency_symbol = symbol.into();
    self
  }

  pub fn into_parts(self) -> ForecourtParts {
    ForecourtParts {
      config: Arc::new(self.config),
      registry: Arc::new(self.registry),
      session: self.session,
      api: self.api,
      metrics: self.metrics.unwrap_or_default(),
      currency_symbol: self.currency_symbol,
    }
  }
}
