//! HTTP front end.
//!
//! Provides four endpoints:
//! - `POST /ping` - run `ping` against a target
//! - `POST /curl` - run `curl` against a target
//! - `GET /cert` - summarize the TLS certificate served by a host
//! - `GET /status` - liveness and pod metadata

mod error;
mod handlers;
mod types;

use std::future::Future;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;

use handlers::{cert_handler, curl_handler, ping_handler, status_handler};
pub use handlers::format_uptime;
pub use types::{AppState, CertQuery, PodMetadata, TargetQuery};

/// Builds the router with all diagnostic endpoints.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/ping", post(ping_handler))
        .route("/curl", post(curl_handler))
        .route("/cert", get(cert_handler))
        .route("/status", get(status_handler))
        .with_state(state)
}

/// Serves `state` on an already bound listener until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<(), anyhow::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        log::info!("Diagnostics server listening on http://{addr}/");
        log::info!("  - Ping:   POST http://{addr}/ping?target=<host>");
        log::info!("  - Curl:   POST http://{addr}/curl?target=<url>");
        log::info!("  - Cert:   GET  http://{addr}/cert?host=<host>&port=443");
        log::info!("  - Status: GET  http://{addr}/status");
    }

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| anyhow::anyhow!("Diagnostics server error: {}", e))?;

    Ok(())
}
