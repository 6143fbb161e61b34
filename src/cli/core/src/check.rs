/* src/cli/core/src/check.rs */

use std::path::Path;

use anyhow::{Result, bail};
use forecourt_engine::{DealerConfig, SectionNotFound, SectionRegistry};
use forecourt_server::builtin_sections;

use crate::config::{ForecourtConfig, load_dealer_config};
use crate::ui;

/// Every configured section that has no registered renderer, in config order.
/// Visibility is ignored: a section hidden for one dealer profile may show for another.
pub fn unresolved_sections<'a>(
  config: &'a DealerConfig,
  registry: &SectionRegistry,
) -> Vec<(&'a str, SectionNotFound)> {
  config
    .pages
    .iter()
    .flat_map(|page| {
      page.sections.iter().filter_map(move |section| {
        registry
          .lookup(&section.catalog_path(&page.page_name), &section.variant)
          .err()
          .map(|e| (page.page_name.as_str(), e))
      })
    })
    .collect()
}

pub fn run_check(config: &ForecourtConfig, base_dir: &Path) -> Result<()> {
  ui::banner("check");
  let dealer_config = load_dealer_config(config, base_dir)?;
  let sections: usize = dealer_config.pages.iter().map(|p| p.sections.len()).sum();
  ui::ok(&format!("{} pages, {sections} sections", dealer_config.pages.len()));

  let missing = unresolved_sections(&dealer_config, &builtin_sections());
  if missing.is_empty() {
    ui::ok("every section resolves");
    return Ok(());
  }
  for (page, err) in &missing {
    ui::fail(&format!("{page}: {err}"));
  }
  bail!("{} unresolved section(s)", missing.len());
}
