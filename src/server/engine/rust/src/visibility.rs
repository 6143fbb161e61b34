/* src/server/engine/rust/src/visibility.rs */

//! Dealer-dependent visibility rules for pages and sections.

use crate::config::{DealerConfig, Page, Section};
use crate::dealer::DealerData;

pub const FINANCE_PAGE: &str = "finance";
pub const TRUSTED_PARTNER_SECTION: &str = "trusted-partner";

/// Regulated finance may only be advertised by dealers with an FCA number.
pub fn is_page_visible(page: &Page, dealer: &DealerData) -> bool {
  page.page_name != FINANCE_PAGE || dealer.has_fca_number()
}

/// Trusted-partner is hidden only when the dealer has neither an FCA number
/// nor any finance company to show.
pub fn is_section_visible(section: &Section, dealer: &DealerData) -> bool {
  if section.folder_name != TRUSTED_PARTNER_SECTION {
    return true;
  }
  dealer.has_fca_number() || dealer.has_finance_companies()
}

/// Navigable pages in configuration order.
pub fn navigable_pages<'a>(config: &'a DealerConfig, dealer: &DealerData) -> Vec<&'a Page> {
  config.pages.iter().filter(|p| is_page_visible(p, dealer)).collect()
}

/// Sections of a page that survive the dealer rules, in configuration order.
pub fn visible_sections<'a>(page: &'a Page, dealer: &DealerData) -> Vec<&'a Section> {
  page.sections.iter().filter(|s| is_section_visible(s, dealer)).collect()
}
