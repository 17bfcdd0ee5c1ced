//! netdiag library: network diagnostics behind a small HTTP API
//!
//! The service runs a fixed set of probes on behalf of callers:
//! - `ping` and `curl` against a validated target, with a hard time limit
//! - TLS certificate inspection of a `host:port`
//! - a `/status` liveness report with pod metadata
//!
//! Ping and curl results can optionally be recorded in PostgreSQL or SQLite.
//! Recording is best-effort and never affects the response.
//!
//! # Example
//!
//! ```no_run
//! use netdiag::{run_server, Config};
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let config = Config {
//!     listen: "127.0.0.1:8000".parse()?,
//!     ..Default::default()
//! };
//! run_server(config).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime.

#![warn(missing_docs)]

mod app;
pub mod command;
pub mod config;
mod error_handling;
pub mod initialization;
mod models;
pub mod server;
pub mod storage;
pub mod tls;
pub mod validation;

// Re-export public API
pub use app::shutdown_signal;
pub use config::{Config, LogFormat, LogLevel};
pub use error_handling::{DatabaseError, InitializationError, ProbeError, TlsError};
pub use models::{CertificateSummary, CommandKind, CommandResult, Fingerprints, StatusReport};
pub use run::run_server;

mod run {
    use anyhow::Result;
    use log::info;
    use tokio::net::TcpListener;

    use crate::app::shutdown_signal;
    use crate::config::Config;
    use crate::error_handling::InitializationError;
    use crate::server::{serve, AppState, PodMetadata};
    use crate::storage::ResultStore;

    /// Runs the diagnostics server until a shutdown signal arrives.
    ///
    /// Builds the result store described by `config` (a disabled one unless
    /// `save_to_db` is set), binds `config.listen`, and serves requests. On
    /// shutdown the database pool is closed after in-flight requests finish.
    ///
    /// # Errors
    ///
    /// Returns an error if the listen address cannot be bound or the server
    /// fails while running. Database problems are logged, never returned.
    pub async fn run_server(config: Config) -> Result<()> {
        let store = ResultStore::from_config(&config).await;
        let state = AppState::new(store.clone(), PodMetadata::from(&config));

        let listener = TcpListener::bind(config.listen).await.map_err(|source| {
            InitializationError::BindError {
                addr: config.listen.to_string(),
                source,
            }
        })?;

        serve(listener, state, shutdown_signal()).await?;

        store.close().await;
        info!("Server stopped");
        Ok(())
    }
}
