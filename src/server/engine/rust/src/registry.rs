/* src/server/engine/rust/src/registry.rs */

//! Explicit section catalog: `(scope, folder) -> (variant -> renderer)`.
//! Built once at startup and looked up by string key.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::config::{Page, Section};
use crate::dealer::DealerData;

/// Everything a section renderer may read.
pub struct SectionContext<'a> {
  pub dealer: &'a DealerData,
  pub page: &'a Page,
  pub section: &'a Section,
  /// Loader result, when the section declares a loader.
  pub data: Option<&'a Value>,
  pub currency_symbol: &'a str,
}

impl SectionContext<'_> {
  pub fn prop_str(&self, key: &str) -> Option<&str> {
    self.section.props.get(key).and_then(Value::as_str)
  }

  pub fn prop_f64(&self, key: &str) -> Option<f64> {
    self.section.props.get(key).and_then(Value::as_f64)
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionError(pub String);

impl SectionError {
  pub fn new(msg: impl Into<String>) -> Self {
    Self(msg.into())
  }
}

impl fmt::Display for SectionError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl std::error::Error for SectionError {}

pub type SectionRenderFn =
  Arc<dyn Fn(&SectionContext<'_>) -> Result<String, SectionError> + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
  Shared,
  Page(String),
}

impl Scope {
  pub fn catalog_path(&self, folder_name: &str) -> String {
    match self {
      Self::Shared => format!("shared/{folder_name}"),
      Self::Page(page) => format!("{page}/{folder_name}"),
    }
  }
}

/// Lookup failure; names the path so the inline error box can show it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionNotFound {
  pub path: String,
  pub variant: String,
  pub folder_known: bool,
}

impl fmt::Display for SectionNotFound {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.folder_known {
      write!(f, "variant \"{}\" not found in sections/{}", self.variant, self.path)
    } else {
      write!(f, "section folder sections/{} not found", self.path)
    }
  }
}

impl std::error::Error for SectionNotFound {}

#[derive(Default, Clone)]
pub struct SectionRegistry {
  folders: BTreeMap<String, BTreeMap<String, SectionRenderFn>>,
}

impl SectionRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn register<F>(mut self, scope: Scope, folder_name: &str, variant: &str, render: F) -> Self
  where
    F: Fn(&SectionContext<'_>) -> Result<String, SectionError> + Send + Sync + 'static,
  {
    self
      .folders
      .entry(scope.catalog_path(folder_name))
      .or_default()
      .insert(variant.to_string(), Arc::new(render));
    self
  }

  /// Add every entry of `other`, replacing clashing variants.
  pub fn merge(mut self, other: SectionRegistry) -> Self {
    for (path, variants) in other.folders {
      self.folders.entry(path).or_default().extend(variants);
    }
    self
  }

  pub fn lookup(&self, path: &str, variant: &str) -> Result<SectionRenderFn, SectionNotFound> {
    let Some(variants) = self.folders.get(path) else {
      return Err(SectionNotFound {
        path: path.to_string(),
        variant: variant.to_string(),
        folder_known: false,
      });
    };
    variants.get(variant).cloned().ok_or_else(|| SectionNotFound {
      path: path.to_string(),
      variant: variant.to_string(),
      folder_known: true,
    })
  }

  /// Catalog listing: path -> variant names, both sorted.
  pub fn catalog(&self) -> BTreeMap<&str, Vec<&str>> {
    self
      .folders
      .iter()
      .map(|(path, variants)| (path.as_str(), variants.keys().map(String::as_str).collect()))
      .collect()
  }

  pub fn len(&self) -> usize {
    self.folders.values().map(BTreeMap::len).sum()
  }

  pub fn is_empty(&self) -> bool {
    self.folders.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn registry() -> SectionRegistry {
    SectionRegistry::new()
      .register(Scope::Shared, "hero", "HeroBanner", |_| Ok("<h1>hero</h1>".into()))
      .register(Scope::Shared, "hero", "HeroVideo", |_| Ok("<video></video>".into()))
      .register(Scope::Page("home".into()), "stock-carousel", "Carousel", |_| Ok(String::new()))
  }

  #[test]
  fn lookup_known_variant() {
    assert!(registry().lookup("shared/hero", "HeroVideo").is_ok());
    assert!(registry().lookup("home/stock-carousel", "Carousel").is_ok());
  }

  #[test]
  fn missing_variant_names_path() {
    let err = registry().lookup("shared/hero", "HeroCarousel").err().unwrap();
    assert!(err.folder_known);
    assert_eq!(err.to_string(), "variant \"HeroCarousel\" not found in sections/shared/hero");
  }

  #[test]
  fn missing_folder_names_path() {
    let err = registry().lookup("contact/map", "MapEmbed").err().unwrap();
    assert!(!err.folder_known);
    assert_eq!(err.to_string(), "section folder sections/contact/map not found");
  }

  #[test]
  fn shared_and_page_scopes_are_distinct() {
    assert!(registry().lookup("home/hero", "HeroBanner").is_err());
  }

  #[test]
  fn merge_overrides_variant() {
    let custom = SectionRegistry::new()
      .register(Scope::Shared, "hero", "HeroBanner", |_| Ok("<h1>custom</h1>".into()));
    let merged = registry().merge(custom);
    assert_eq!(merged.len(), 3);
    let catalog = merged.catalog();
    assert_eq!(catalog["shared/hero"], ["HeroBanner", "HeroVideo"]);
  }
}
