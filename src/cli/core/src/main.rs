/* src/cli/core/src/main.rs */

mod check;
mod config;
mod finance;
mod pages;
mod serve;
mod ui;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use config::{ForecourtConfig, apply_env_overrides, find_forecourt_config, load_forecourt_config};

#[derive(Parser)]
#[command(name = "forecourt", about = "Forecourt dealer site CLI")]
struct Cli {
  /// Log at debug level (RUST_LOG takes precedence)
  #[arg(short, long, global = true)]
  verbose: bool,
  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Serve the dealer site
  Serve {
    /// Path to forecourt.toml (auto-detected if omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Listen port, overrides [server].port and PORT
    #[arg(short, long)]
    port: Option<u16>,
  },
  /// Open a dealer session and list the pages the dealer can navigate to
  Pages {
    /// Path to forecourt.toml (auto-detected if omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,
  },
  /// Print a finance quote
  Finance(finance::FinanceArgs),
  /// Check that every configured section resolves to a registered variant
  Check {
    /// Path to forecourt.toml (auto-detected if omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,
  },
}

fn init_tracing(verbose: bool) {
  let filter = if verbose { "debug" } else { "info" };
  tracing_subscriber::registry()
    .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
    .with(tracing_subscriber::fmt::layer())
    .init();
}

/// Resolve config path (explicit or auto-detected), parse it and apply env overrides
fn resolve_config(explicit: Option<PathBuf>) -> Result<(PathBuf, ForecourtConfig)> {
  let path = match explicit {
    Some(p) => p,
    None => {
      let cwd = std::env::current_dir().context("failed to get cwd")?;
      find_forecourt_config(&cwd)?
    }
  };
  let mut config = load_forecourt_config(&path)?;
  apply_env_overrides(&mut config, |name| std::env::var(name).ok());
  Ok((path, config))
}

fn base_dir(config_path: &Path) -> &Path {
  config_path.parent().unwrap_or_else(|| Path::new("."))
}

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  match cli.command {
    Command::Serve { config, port } => {
      let (config_path, mut forecourt_config) = resolve_config(config)?;
      if let Some(port) = port {
        forecourt_config.server.port = port;
      }
      serve::run_serve(&forecourt_config, base_dir(&config_path)).await?;
    }
    Command::Pages { config } => {
      let (config_path, forecourt_config) = resolve_config(config)?;
      pages::run_pages(&forecourt_config, base_dir(&config_path)).await?;
    }
    Command::Finance(args) => finance::run_finance(&args)?,
    Command::Check { config } => {
      let (config_path, forecourt_config) = resolve_config(config)?;
      check::run_check(&forecourt_config, base_dir(&config_path))?;
    }
  }

  Ok(())
}
