/* src/server/core/rust/src/lib.rs */

pub mod api;
pub mod catalog;
pub mod errors;
pub mod server;
pub mod session;
pub mod token;

// Re-exports for ergonomic use
pub use api::{ApiClient, FormField};
pub use catalog::builtin_sections;
pub use errors::ForecourtError;
pub use forecourt_engine;
pub use server::{ForecourtParts, ForecourtServer};
pub use session::{DealerSession, SessionProvider, SessionState, load_dealer_session};
pub use token::{DEALER_CLAIM, decode_dealer_profile};
