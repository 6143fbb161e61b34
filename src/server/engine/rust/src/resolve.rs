/* src/server/engine/rust/src/resolve.rs */

//! Route matching and section resolution for one navigation.

use crate::config::{DealerConfig, Page, Section};
use crate::dealer::DealerData;
use crate::document::section_error_box;
use crate::registry::{SectionContext, SectionNotFound, SectionRegistry, SectionRenderFn};
use crate::visibility::{is_page_visible, visible_sections};

/// Strip query/fragment and trailing slash; empty becomes the index route.
pub fn normalize_path(path: &str) -> &str {
  let path = path.split(['?', '#']).next().unwrap_or(path);
  let trimmed = path.trim_end_matches('/');
  if trimmed.is_empty() { "/" } else { trimmed }
}

/// Exact match against navigable pages. `/` is the index route.
pub fn match_page<'a>(
  config: &'a DealerConfig,
  dealer: &DealerData,
  path: &str,
) -> Option<&'a Page> {
  let wanted = normalize_path(path);
  config
    .pages
    .iter()
    .filter(|p| is_page_visible(p, dealer))
    .find(|p| normalize_path(&p.path) == wanted)
}

pub enum ResolvedSection<'a> {
  Ready { section: &'a Section, path: String, render: SectionRenderFn },
  Missing { section: &'a Section, error: SectionNotFound },
}

impl<'a> ResolvedSection<'a> {
  pub fn section(&self) -> &'a Section {
    match self {
      Self::Ready { section, .. } | Self::Missing { section, .. } => section,
    }
  }

  pub fn is_ready(&self) -> bool {
    matches!(self, Self::Ready { .. })
  }
}

/// Filter the page's sections and look each one up independently.
/// A missing variant only affects its own entry.
pub fn resolve_sections<'a>(
  page: &'a Page,
  dealer: &DealerData,
  registry: &SectionRegistry,
) -> Vec<ResolvedSection<'a>> {
  visible_sections(page, dealer)
    .into_iter()
    .map(|section| {
      let path = section.catalog_path(&page.page_name);
      match registry.lookup(&path, &section.variant) {
        Ok(render) => ResolvedSection::Ready { section, path, render },
        Err(error) => ResolvedSection::Missing { section, error },
      }
    })
    .collect()
}

/// Render one resolved section. Lookup and renderer failures become an
/// inline error box; they never reach the page.
pub fn render_section(
  resolved: &ResolvedSection<'_>,
  ctx: &SectionContext<'_>,
) -> Result<String, String> {
  match resolved {
    ResolvedSection::Ready { path, render, .. } => {
      render(ctx).map_err(|e| section_error_box(path, &e.to_string()))
    }
    ResolvedSection::Missing { error, .. } => {
      Err(section_error_box(&error.path, &error.to_string()))
    }
  }
}
