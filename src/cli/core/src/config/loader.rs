/* src/cli/core/src/config/loader.rs */

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use forecourt_engine::DealerConfig;

use super::ForecourtConfig;

pub const CONFIG_FILE: &str = "forecourt.toml";

/// Walk upward from `start` to find `forecourt.toml`, like Cargo.toml discovery
pub fn find_forecourt_config(start: &Path) -> Result<PathBuf> {
  let mut dir =
    start.canonicalize().with_context(|| format!("failed to canonicalize {}", start.display()))?;
  loop {
    let candidate = dir.join(CONFIG_FILE);
    if candidate.is_file() {
      return Ok(candidate);
    }
    if !dir.pop() {
      bail!("{CONFIG_FILE} not found (searched upward from {})", start.display());
    }
  }
}

pub fn load_forecourt_config(path: &Path) -> Result<ForecourtConfig> {
  let content =
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
  let config: ForecourtConfig =
    toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))?;
  config.validate()?;
  Ok(config)
}

/// Environment overrides. `lookup` is `std::env::var` in production.
pub fn apply_env_overrides(config: &mut ForecourtConfig, lookup: impl Fn(&str) -> Option<String>) {
  if let Some(key) = lookup("FORECOURT_DEALER") {
    config.dealer.key = Some(key);
  }
  if let Some(token) = lookup("FORECOURT_DEALER_TOKEN") {
    config.dealer.token = Some(token);
  }
  if let Some(base) = lookup("FORECOURT_API_BASE") {
    config.api.base_url = Some(base);
  }
  if let Some(port) = lookup("PORT").and_then(|p| p.trim().parse().ok()) {
    config.server.port = port;
  }
}

/// Read the dealer configuration named by `[dealer].config`, resolved
/// against the directory holding forecourt.toml.
pub fn load_dealer_config(config: &ForecourtConfig, base_dir: &Path) -> Result<DealerConfig> {
  let path = base_dir.join(&config.dealer.config);
  let json =
    std::fs::read_to_string(&path).with_context(|| format!("failed to read {}", path.display()))?;
  DealerConfig::from_json(&json, config.dealer.key.as_deref())
    .with_context(|| format!("invalid dealer config {}", path.display()))
}
