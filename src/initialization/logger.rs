//! Logger setup for the diagnostics service.
//!
//! Two output shapes are supported: colored lines for a terminal, and one
//! JSON object per line for a cluster log collector.

use std::io::Write;

use colored::{ColoredString, Colorize};
use log::{Level, LevelFilter};
use serde_json::json;

use crate::config::LogFormat;
use crate::error_handling::InitializationError;

/// Dependencies whose records are capped regardless of `level`.
const QUIET_MODULES: &[(&str, LevelFilter)] = &[
    ("sqlx", LevelFilter::Warn),
    ("hyper", LevelFilter::Info),
    ("rustls", LevelFilter::Warn),
];

/// Marker and colored level name for a plain-format line.
fn level_badge(level: Level) -> (&'static str, ColoredString) {
    let name = level.as_str();
    match level {
        Level::Error => ("❌", name.red()),
        Level::Warn => ("⚠️", name.yellow()),
        Level::Info => ("✔️", name.green()),
        Level::Debug => ("🔍", name.blue()),
        Level::Trace => ("🔬", name.purple()),
    }
}

/// One log record as a single-line JSON object.
fn json_line(ts_millis: i64, level: Level, target: &str, msg: &str) -> String {
    json!({
        "ts": ts_millis,
        "level": level.as_str(),
        "target": target,
        "msg": msg,
    })
    .to_string()
}

/// Installs the process-wide logger.
///
/// `RUST_LOG` is honoured first; `level` then applies to everything, including
/// `netdiag` itself, except the dependencies in `QUIET_MODULES`.
///
/// # Errors
///
/// Returns `InitializationError::LoggerError` if a logger is already installed.
///
/// # Examples
///
/// ```bash
/// # Trace the result store without the sqlx chatter
/// RUST_LOG=netdiag::storage=trace netdiag --save-to-db true
///
/// # JSON lines for the cluster log pipeline
/// LOG_FORMAT=json netdiag
/// ```
pub fn init_logger_with(level: LevelFilter, format: LogFormat) -> Result<(), InitializationError> {
    let mut builder = env_logger::Builder::from_default_env();
    builder.filter_level(level);
    for (module, cap) in QUIET_MODULES {
        builder.filter_module(module, *cap);
    }
    builder.filter_module("netdiag", level);

    match format {
        LogFormat::Json => {
            builder.format(|buf, record| {
                let line = json_line(
                    chrono::Utc::now().timestamp_millis(),
                    record.level(),
                    record.target(),
                    &record.args().to_string(),
                );
                writeln!(buf, "{line}")
            });
        }
        LogFormat::Plain => {
            builder.format(|buf, record| {
                let (marker, level) = level_badge(record.level());
                writeln!(
                    buf,
                    "{marker} {} [{level}] {}",
                    record.target().cyan(),
                    record.args()
                )
            });
        }
    }

    builder.try_init()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_json_line_is_one_parseable_object() {
        let line = json_line(
            1_700_000_000_000,
            Level::Warn,
            "netdiag::storage::store",
            "Error saving result: \"pool timed out\"\nretrying later",
        );
        assert!(!line.contains('\n'));

        let value: Value = serde_json::from_str(&line).expect("valid JSON");
        assert_eq!(value["ts"], 1_700_000_000_000_i64);
        assert_eq!(value["level"], "WARN");
        assert_eq!(value["target"], "netdiag::storage::store");
        assert_eq!(
            value["msg"],
            "Error saving result: \"pool timed out\"\nretrying later"
        );
    }

    #[test]
    fn test_level_badge_keeps_level_name() {
        for level in [
            Level::Error,
            Level::Warn,
            Level::Info,
            Level::Debug,
            Level::Trace,
        ] {
            let (marker, name) = level_badge(level);
            assert!(!marker.is_empty());
            assert_eq!(name.input, level.as_str());
        }
    }

    #[test]
    fn test_noisy_dependencies_are_capped() {
        let cap = |name: &str| {
            QUIET_MODULES
                .iter()
                .find(|(module, _)| *module == name)
                .map(|(_, cap)| *cap)
        };
        assert_eq!(cap("sqlx"), Some(LevelFilter::Warn));
        assert_eq!(cap("rustls"), Some(LevelFilter::Warn));
        assert_eq!(cap("netdiag"), None);
    }

    #[test]
    fn test_second_logger_install_fails_cleanly() {
        // Whichever call installs first wins; the other must fail, not panic
        let first = init_logger_with(LevelFilter::Info, LogFormat::Plain);
        let second = init_logger_with(LevelFilter::Debug, LogFormat::Json);
        assert!(first.is_err() || second.is_err());
        assert!(matches!(
            second,
            Err(InitializationError::LoggerError(_)) | Ok(())
        ));
    }
}
