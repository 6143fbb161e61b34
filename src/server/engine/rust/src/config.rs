/* src/server/engine/rust/src/config.rs */

//! Per-dealer page configuration. Pure parsing on JSON strings, no filesystem I/O.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DealerConfig {
  pub pages: Vec<Page>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
  pub page_name: String,
  pub path: String,
  /// SEO title template, `{companyName}` style placeholders.
  #[serde(default)]
  pub title: String,
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub sections: Vec<Section>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
  pub folder_name: String,
  #[serde(default)]
  pub is_shared: bool,
  pub variant: String,
  #[serde(default)]
  pub props: Value,
  /// API path whose JSON result is handed to the renderer as section data.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub loader: Option<SectionLoader>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionLoader {
  pub path: String,
}

#[derive(Debug)]
pub enum ConfigError {
  Parse(String),
  UnknownDealer { key: String, available: Vec<String> },
  MissingDealerKey { available: Vec<String> },
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Parse(msg) => write!(f, "parse dealer config: {msg}"),
      Self::UnknownDealer { key, available } => {
        write!(f, "dealer \"{key}\" not found in config (available: {})", available.join(", "))
      }
      Self::MissingDealerKey { available } => write!(
        f,
        "config holds several dealers, select one of: {}",
        available.join(", ")
      ),
    }
  }
}

impl std::error::Error for ConfigError {}

impl DealerConfig {
  /// Parse a configuration document. The document is either a single config
  /// (top-level `pages`) or an object of configs keyed by dealer, in which
  /// case `dealer_key` picks the subtree.
  pub fn from_json(json: &str, dealer_key: Option<&str>) -> Result<Self, ConfigError> {
    let root: Value = serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;

    let subtree = if root.get("pages").is_some() {
      root
    } else {
      let Value::Object(mut dealers) = root else {
        return Err(ConfigError::Parse("expected a JSON object".into()));
      };
      let available: Vec<String> = dealers.keys().cloned().collect();
      match dealer_key {
        Some(key) => dealers
          .remove(key)
          .ok_or_else(|| ConfigError::UnknownDealer { key: key.to_string(), available })?,
        None if dealers.len() == 1 => {
          dealers.into_iter().next().map(|(_, v)| v).unwrap_or_default()
        }
        None => return Err(ConfigError::MissingDealerKey { available }),
      }
    };

    serde_json::from_value(subtree).map_err(|e| ConfigError::Parse(e.to_string()))
  }

  pub fn page(&self, page_name: &str) -> Option<&Page> {
    self.pages.iter().find(|p| p.page_name == page_name)
  }
}

impl Section {
  /// Registry key: `shared/<folder>` or `<page>/<folder>`.
  pub fn catalog_path(&self, page_name: &str) -> String {
    if self.is_shared {
      format!("shared/{}", self.folder_name)
    } else {
      format!("{page_name}/{}", self.folder_name)
    }
  }
}
