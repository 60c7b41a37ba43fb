//! Liveness endpoint for container orchestration.

use std::net::SocketAddr;

use axum::{Router, http::StatusCode, routing::get};
use tokio::net::TcpListener;
use tracing::{error, info, instrument};

use crate::base::types::Res;

/// Builds the health router: `GET /health` answers `ok`, anything else is `501`.
pub fn router() -> Router {
    Router::new().route("/health", get(health)).fallback(not_implemented)
}

async fn health() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}

async fn not_implemented() -> (StatusCode, &'static str) {
    (StatusCode::NOT_IMPLEMENTED, "not implemented")
}

/// Binds `listen` and serves the health router in the background.
///
/// Binding errors are returned to the caller; errors after that are logged.
/// Returns the bound address, which differs from `listen` when port `0` is used.
#[instrument]
pub async fn start(listen: &str) -> Res<SocketAddr> {
    let listener = TcpListener::bind(listen).await.map_err(|e| anyhow::anyhow!("Unable to bind health listener on {}: {}", listen, e))?;
    let addr = listener.local_addr()?;

    info!("Health endpoint listening on {}", addr);

    tokio::spawn(async move {
        if let Err(err) = axum::serve(listener, router()).await {
            error!("Health endpoint stopped: {}", err);
        }
    });

    Ok(addr)
}
