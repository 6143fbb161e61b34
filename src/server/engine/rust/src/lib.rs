/* src/server/engine/rust/src/lib.rs */

pub mod config;
pub mod dealer;
pub mod document;
pub mod finance;
pub mod forms;
pub mod metrics;
pub mod registry;
pub mod resolve;
pub mod visibility;

// Public API re-exports
pub use config::{ConfigError, DealerConfig, Page, Section, SectionLoader};
pub use dealer::{DealerData, FinanceCompany, OpeningTime, SocialLinks};
pub use document::{
  escape_html, loading_document, not_found_document, render_document, render_meta_template,
  section_error_box, session_error_document, NavLink,
};
pub use finance::{
  calculate_amount_of_interest, calculate_borrowing, calculate_finance, calculate_finance_checked,
  calculate_monthly_payment, calculate_total_amount_payable, format_currency, quote, quote_checked,
  round2, FinanceCalculations, FinanceInputs, FinanceQuote, FinanceType, InvalidFinanceInput,
  QuoteSummary,
};
pub use forms::{FieldError, FormKind};
pub use metrics::{Metric, MetricStats, MetricsCollector};
pub use registry::{
  Scope, SectionContext, SectionError, SectionNotFound, SectionRegistry, SectionRenderFn,
};
pub use resolve::{match_page, normalize_path, render_section, resolve_sections, ResolvedSection};
pub use visibility::{navigable_pages, visible_sections};
