//! `/status` handler.

use std::future::Future;
use std::io;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use axum::extract::State;
use axum::Json;
use log::{debug, warn};

use super::super::types::AppState;
use crate::config::{HOSTNAME_LOOKUP_TIMEOUT_SECS, UNKNOWN};
use crate::models::StatusReport;

/// Formats elapsed seconds as `H:MM:SS`, prefixed by `N day, ` or
/// `N days, ` once a full day has passed.
pub fn format_uptime(total_seconds: u64) -> String {
    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3_600;
    let minutes = (total_seconds % 3_600) / 60;
    let seconds = total_seconds % 60;

    let clock = format!("{hours}:{minutes:02}:{seconds:02}");
    match days {
        0 => clock,
        1 => format!("1 day, {clock}"),
        n => format!("{n} days, {clock}"),
    }
}

/// Picks the first IPv4 address from `lookup`, else the first address.
///
/// Returns `None` if the lookup fails or takes longer than `limit`.
async fn first_ip<F, I>(name: &str, lookup: F, limit: Duration) -> Option<IpAddr>
where
    F: Future<Output = io::Result<I>>,
    I: Iterator<Item = SocketAddr>,
{
    let addrs: Vec<IpAddr> = match tokio::time::timeout(limit, lookup).await {
        Ok(Ok(addrs)) => addrs.map(|addr| addr.ip()).collect(),
        Ok(Err(e)) => {
            debug!("Could not resolve own hostname {name}: {e}");
            return None;
        }
        Err(_) => {
            warn!("Resolving own hostname {name} took longer than {limit:?}");
            return None;
        }
    };
    addrs
        .iter()
        .copied()
        .find(IpAddr::is_ipv4)
        .or_else(|| addrs.first().copied())
}

/// Resolves this host's own name, preferring an IPv4 address.
async fn container_ip() -> Option<IpAddr> {
    let name = hostname::get().ok()?.into_string().ok()?;
    first_ip(
        &name,
        tokio::net::lookup_host((name.as_str(), 0)),
        Duration::from_secs(HOSTNAME_LOOKUP_TIMEOUT_SECS),
    )
    .await
}

/// Liveness endpoint; always answers 200.
pub async fn status_handler(State(state): State<AppState>) -> Json<StatusReport> {
    let ip_address = container_ip()
        .await
        .map(|ip| ip.to_string())
        .unwrap_or_else(|| UNKNOWN.to_string());

    Json(StatusReport {
        status: "ok".to_string(),
        ip_address,
        uptime: format_uptime(state.start_time.elapsed().as_secs()),
        pod_name: state.metadata.pod_name.clone(),
        namespace: state.metadata.namespace.clone(),
        node_name: state.metadata.node_name.clone(),
    })
}
