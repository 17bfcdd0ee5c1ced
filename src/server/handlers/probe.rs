//! `/ping` and `/curl` handlers.

use axum::extract::{Query, State};
use axum::Json;
use log::{info, warn};

use super::super::types::{AppState, TargetQuery};
use crate::command::probe;
use crate::error_handling::ProbeError;
use crate::models::{CommandKind, CommandResult};
use crate::validation::ProbeTarget;

/// Validates the target, runs `kind`, and hands the result to the store.
async fn run_probe(
    state: &AppState,
    kind: CommandKind,
    raw_target: &str,
) -> Result<Json<CommandResult>, ProbeError> {
    let target = ProbeTarget::parse(raw_target).inspect_err(|_| {
        warn!("Rejected {kind} target {raw_target:?}");
    })?;

    let result = probe(kind, &target).await.inspect_err(|e| {
        warn!("{kind} against {target} failed: {e}");
    })?;

    info!(
        "{kind} against {target} completed ({} bytes of output)",
        result.output.len()
    );
    state.store.save_in_background(result.clone());
    Ok(Json(result))
}

/// `POST /ping?target=...`
pub async fn ping_handler(
    State(state): State<AppState>,
    Query(query): Query<TargetQuery>,
) -> Result<Json<CommandResult>, ProbeError> {
    run_probe(&state, CommandKind::Ping, &query.target).await
}

/// `POST /curl?target=...`
pub async fn curl_handler(
    State(state): State<AppState>,
    Query(query): Query<TargetQuery>,
) -> Result<Json<CommandResult>, ProbeError> {
    run_probe(&state, CommandKind::Curl, &query.target).await
}
