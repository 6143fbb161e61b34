/* src/cli/core/src/config/mod.rs */

mod loader;
mod types;

#[cfg(test)]
mod tests;

pub use loader::{
  apply_env_overrides, find_forecourt_config, load_dealer_config, load_forecourt_config,
};
pub use types::ForecourtConfig;
