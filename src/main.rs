//! Main application entry point (server binary).
//!
//! This is a thin wrapper around the `netdiag` library that handles:
//! - Environment variable loading (.env file)
//! - Command-line / environment configuration
//! - Logger and crypto provider initialization
//!
//! All request handling is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use netdiag::initialization::{init_crypto_provider, init_logger_with};
use netdiag::{run_server, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file (if it exists)
    // Try the current directory first, then the executable's directory
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let config = Config::parse();

    let log_level = config.log_level.clone();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    // Initialize crypto provider for TLS operations
    init_crypto_provider();

    if let Err(e) = run_server(config).await {
        eprintln!("netdiag error: {:#}", e);
        process::exit(1);
    }
    Ok(())
}
