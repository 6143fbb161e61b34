/* src/cli/core/src/config/types.rs */

use anyhow::{Result, bail};
use forecourt_server::DEALER_CLAIM;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ForecourtConfig {
  pub dealer: DealerSection,
  #[serde(default)]
  pub api: ApiSection,
  #[serde(default)]
  pub server: ServerSection,
  #[serde(default)]
  pub finance: FinanceSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DealerSection {
  /// Dealer configuration document, relative to forecourt.toml.
  pub config: String,
  pub key: Option<String>,
  pub token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiSection {
  pub base_url: Option<String>,
  #[serde(default = "default_claim")]
  pub claim: String,
}

impl Default for ApiSection {
  fn default() -> Self {
    Self { base_url: None, claim: default_claim() }
  }
}

fn default_claim() -> String {
  DEALER_CLAIM.to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSection {
  #[serde(default = "default_host")]
  pub host: String,
  #[serde(default = "default_port")]
  pub port: u16,
}

impl Default for ServerSection {
  fn default() -> Self {
    Self { host: default_host(), port: default_port() }
  }
}

fn default_host() -> String {
  "0.0.0.0".to_string()
}

fn default_port() -> u16 {
  3000
}

#[derive(Debug, Clone, Deserialize)]
pub struct FinanceSection {
  #[serde(default = "default_currency_symbol")]
  pub currency_symbol: String,
}

impl Default for FinanceSection {
  fn default() -> Self {
    Self { currency_symbol: default_currency_symbol() }
  }
}

fn default_currency_symbol() -> String {
  forecourt_engine::finance::DEFAULT_CURRENCY_SYMBOL.to_string()
}

/// Settings needed to open a dealer session.
pub struct SessionSettings<'a> {
  pub token: &'a str,
  pub base_url: &'a str,
  pub claim: &'a str,
}

impl ForecourtConfig {
  pub fn validate(&self) -> Result<()> {
    if self.dealer.config.trim().is_empty() {
      bail!("dealer.config must not be empty");
    }
    if self.finance.currency_symbol.is_empty() {
      bail!("finance.currency_symbol must not be empty");
    }
    Ok(())
  }

  /// Token and API base must both be set once env overrides are applied.
  pub fn session_settings(&self) -> Result<SessionSettings<'_>> {
    let token = self.dealer.token.as_deref().map(str::trim).unwrap_or_default();
    if token.is_empty() {
      bail!("dealer token missing: set dealer.token or FORECOURT_DEALER_TOKEN");
    }
    let base_url = self.api.base_url.as_deref().map(str::trim).unwrap_or_default();
    if base_url.is_empty() {
      bail!("API base URL missing: set api.base_url or FORECOURT_API_BASE");
    }
    Ok(SessionSettings { token, base_url, claim: &self.api.claim })
  }

  pub fn listen_addr(&self) -> String {
    format!("{}:{}", self.server.host, self.server.port)
  }
}
