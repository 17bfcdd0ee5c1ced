//! Diagnostic command execution.
//!
//! Each [`CommandKind`] maps to a fixed argv template. The target is the only
//! caller-controlled element and is appended as a single argument after it has
//! been validated, so no flag or shell syntax can be smuggled in.

mod runner;

use std::time::Duration;

use chrono::Utc;
use log::info;

use crate::config::{COMMAND_TIMEOUT_SECS, PING_COUNT};
use crate::error_handling::ProbeError;
use crate::models::{CommandKind, CommandResult};
use crate::validation::ProbeTarget;

pub use runner::run;

impl CommandKind {
    /// Builds the full argument vector for this command against `target`.
    pub fn argv(&self, target: &ProbeTarget) -> Vec<String> {
        let mut argv: Vec<String> = match self {
            CommandKind::Ping => vec!["ping".into(), "-q".into(), "-c".into(), PING_COUNT.into()],
            CommandKind::Curl => vec!["curl".into(), "-s".into()],
        };
        argv.push(target.as_str().to_string());
        argv
    }
}

/// Runs `kind` against an already validated target with the default time limit.
///
/// `created_at` is stamped when the command completes.
pub async fn probe(kind: CommandKind, target: &ProbeTarget) -> Result<CommandResult, ProbeError> {
    probe_with_timeout(kind, target, Duration::from_secs(COMMAND_TIMEOUT_SECS)).await
}

/// Same as [`probe`] with an explicit time limit.
pub async fn probe_with_timeout(
    kind: CommandKind,
    target: &ProbeTarget,
    timeout: Duration,
) -> Result<CommandResult, ProbeError> {
    info!(
        "Running {kind} against {} target {target}",
        target.shape().as_str()
    );
    let output = run(&kind.argv(target), timeout).await?;

    Ok(CommandResult {
        command: kind,
        target: target.as_str().to_string(),
        output,
        created_at: Utc::now(),
    })
}
