//! Server state and request parameters.

use std::sync::Arc;
use std::time::Instant;

use serde::Deserialize;

use crate::config::{Config, DEFAULT_TLS_PORT};
use crate::storage::ResultStore;

/// Pod placement reported by `/status`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PodMetadata {
    /// `POD_NAME`
    pub pod_name: String,
    /// `POD_NAMESPACE`
    pub namespace: String,
    /// `NODE_NAME`
    pub node_name: String,
}

impl From<&Config> for PodMetadata {
    fn from(config: &Config) -> Self {
        PodMetadata {
            pod_name: config.pod_name.clone(),
            namespace: config.pod_namespace.clone(),
            node_name: config.node_name.clone(),
        }
    }
}

/// Shared state for the HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Where probe results are recorded
    pub store: ResultStore,
    /// Process start, for `/status` uptime
    pub start_time: Arc<Instant>,
    /// Reported verbatim by `/status`
    pub metadata: Arc<PodMetadata>,
}

impl AppState {
    /// Creates the state, starting the uptime clock now.
    pub fn new(store: ResultStore, metadata: PodMetadata) -> Self {
        AppState {
            store,
            start_time: Arc::new(Instant::now()),
            metadata: Arc::new(metadata),
        }
    }
}

/// Query string of `/ping` and `/curl`
#[derive(Debug, Deserialize)]
pub struct TargetQuery {
    /// Host, IPv4 address or URL to probe
    pub target: String,
}

fn default_tls_port() -> u16 {
    DEFAULT_TLS_PORT
}

/// Query string of `/cert`
#[derive(Debug, Deserialize)]
pub struct CertQuery {
    /// Host to connect to and verify against
    pub host: String,
    /// Defaults to 443
    #[serde(default = "default_tls_port")]
    pub port: u16,
}
