/* src/server/adapter/axum/src/lib.rs */

mod error;
mod handler;

use std::future::Future;

use forecourt_server::ForecourtServer;
use tracing::info;

/// Re-export forecourt-server core for convenience
pub use forecourt_server;

/// Extension trait that converts a `ForecourtServer` into an Axum router.
pub trait IntoAxumRouter {
  fn into_axum_router(self) -> axum::Router;

  /// Bootstrap the dealer session in the background and serve until `shutdown` resolves.
  fn serve(
    self,
    addr: &str,
    shutdown: impl Future<Output = ()> + Send + 'static,
  ) -> impl Future<Output = Result<(), Box<dyn std::error::Error + Send + Sync>>> + Send;
}

impl IntoAxumRouter for ForecourtServer {
  fn into_axum_router(self) -> axum::Router {
    handler::build_router(self.into_parts())
  }

  async fn serve(
    self,
    addr: &str,
    shutdown: impl Future<Output = ()> + Send + 'static,
  ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let parts = self.into_parts();
    let session = parts.session.clone();
    tokio::spawn(async move {
      session.bootstrap().await;
    });

    let router = handler::build_router(parts);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;
    info!("Forecourt dealer site running on http://localhost:{}", local_addr.port());
    axum::serve(listener, router).with_graceful_shutdown(shutdown).await?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use forecourt_engine::{DealerConfig, DealerData};
  use forecourt_server::{ApiClient, DealerSession, SessionProvider};

  use super::*;

  #[test]
  fn into_axum_router_builds_without_panic() {
    let session = SessionProvider::ready(DealerSession {
      auth_token: "t".into(),
      dealer: DealerData::default(),
    });
    let server =
      ForecourtServer::new(DealerConfig::default(), ApiClient::new("http://127.0.0.1:9"), session);
    let _router = server.into_axum_router();
  }
}
