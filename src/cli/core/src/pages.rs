/* src/cli/core/src/pages.rs */

use std::path::Path;

use anyhow::{Result, bail};
use forecourt_engine::{navigable_pages, render_meta_template};
use forecourt_server::{ApiClient, SessionProvider, SessionState};

use crate::config::{ForecourtConfig, load_dealer_config};
use crate::ui;

pub async fn run_pages(config: &ForecourtConfig, base_dir: &Path) -> Result<()> {
  let dealer_config = load_dealer_config(config, base_dir)?;
  let settings = config.session_settings()?;

  ui::banner("pages");
  let provider =
    SessionProvider::new(ApiClient::new(settings.base_url), settings.token, settings.claim);
  let session = match provider.bootstrap().await {
    SessionState::Ready(session) => session,
    SessionState::Failed(message) => {
      ui::fail("dealer session failed");
      bail!("{message}");
    }
    SessionState::Loading => bail!("dealer session did not finish loading"),
  };

  let dealer = &session.dealer;
  ui::ok(&format!("dealer session ready: {}", dealer.company_name));
  match dealer.fca_number.as_deref().filter(|_| dealer.has_fca_number()) {
    Some(fca) => ui::row("FCA number", fca),
    None => ui::warn("no FCA number: finance page hidden"),
  }
  ui::blank();

  let visible = navigable_pages(&dealer_config, dealer);
  for page in &visible {
    ui::row(&page.path, &render_meta_template(&page.title, dealer));
  }
  let hidden =
    dealer_config.pages.iter().filter(|p| !visible.iter().any(|v| v.page_name == p.page_name));
  for page in hidden {
    ui::detail(&format!("hidden: {} ({})", page.page_name, page.path));
  }
  Ok(())
}
