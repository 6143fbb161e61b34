/* src/server/core/rust/src/session.rs */

//! Dealer session bootstrap: exchange the dealer token for an auth token and
//! the dealer profile, then hold the result for every request.

use std::sync::Arc;

use forecourt_engine::DealerData;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

use crate::api::ApiClient;
use crate::errors::ForecourtError;
use crate::token::decode_dealer_profile;

pub const AUTH_PATH: &str = "/api/auth/website-auth";

#[derive(Debug, Clone)]
pub struct DealerSession {
  pub auth_token: String,
  pub dealer: DealerData,
}

#[derive(Debug, Clone)]
pub enum SessionState {
  Loading,
  Ready(Arc<DealerSession>),
  Failed(String),
}

impl SessionState {
  pub fn label(&self) -> &'static str {
    match self {
      Self::Loading => "loading",
      Self::Ready(_) => "ready",
      Self::Failed(_) => "failed",
    }
  }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthResponse {
  auth_token: String,
  info_token: String,
}

/// One token exchange. Any failure along the way is returned as-is; the
/// provider turns it into `SessionState::Failed`.
pub async fn load_dealer_session(
  api: &ApiClient,
  dealer_token: &str,
  claim: &str,
) -> Result<DealerSession, ForecourtError> {
  let body = api.post_api(AUTH_PATH, &json!({ "Token": dealer_token }), None).await?;
  let auth: AuthResponse = serde_json::from_value(body)
    .map_err(|e| ForecourtError::upstream(format!("auth response: {e}")))?;
  let dealer = decode_dealer_profile(&auth.info_token, claim)?;
  Ok(DealerSession { auth_token: auth.auth_token, dealer })
}

struct Exchange {
  api: ApiClient,
  dealer_token: String,
  claim: String,
}

/// Owns the session state. Readers take snapshots; only `bootstrap` and
/// `retry` write, serialised by `writer`.
#[derive(Clone)]
pub struct SessionProvider {
  exchange: Option<Arc<Exchange>>,
  state: Arc<RwLock<SessionState>>,
  writer: Arc<Mutex<()>>,
}

impl SessionProvider {
  /// Starts in `Loading`; call `bootstrap` to run the exchange.
  pub fn new(api: ApiClient, dealer_token: impl Into<String>, claim: impl Into<String>) -> Self {
    Self {
      exchange: Some(Arc::new(Exchange {
        api,
        dealer_token: dealer_token.into(),
        claim: claim.into(),
      })),
      state: Arc::new(RwLock::new(SessionState::Loading)),
      writer: Arc::new(Mutex::new(())),
    }
  }

  /// A provider that is already loaded and never exchanges tokens.
  pub fn ready(session: DealerSession) -> Self {
    Self {
      exchange: None,
      state: Arc::new(RwLock::new(SessionState::Ready(Arc::new(session)))),
      writer: Arc::new(Mutex::new(())),
    }
  }

  pub async fn state(&self) -> SessionState {
    self.state.read().await.clone()
  }

  pub async fn session(&self) -> Option<Arc<DealerSession>> {
    match &*self.state.read().await {
      SessionState::Ready(session) => Some(session.clone()),
      _ => None,
    }
  }

  /// Run the exchange once and store the outcome.
  pub async fn bootstrap(&self) -> SessionState {
    let _guard = self.writer.lock().await;
    self.run_exchange().await
  }

  /// Re-run the exchange, but only from `Failed`. Other states are returned unchanged.
  pub async fn retry(&self) -> SessionState {
    let _guard = self.writer.lock().await;
    let current = self.state().await;
    if !matches!(current, SessionState::Failed(_)) {
      return current;
    }
    info!("retrying dealer session bootstrap");
    self.run_exchange().await
  }

  async fn run_exchange(&self) -> SessionState {
    let Some(exchange) = &self.exchange else {
      return self.state().await;
    };
    *self.state.write().await = SessionState::Loading;
    let loaded = load_dealer_session(&exchange.api, &exchange.dealer_token, &exchange.claim).await;
    let next = match loaded {
      Ok(session) => {
        info!(dealer = %session.dealer.company_name, "dealer session ready");
        SessionState::Ready(Arc::new(session))
      }
      Err(e) => {
        warn!(error = %e, "dealer session bootstrap failed");
        SessionState::Failed(e.message().to_string())
      }
    };
    *self.state.write().await = next.clone();
    next
  }
}
