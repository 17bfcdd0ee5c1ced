//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (timeouts, command parameters, etc.)
//! - CLI option types, each backed by an environment variable

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{Config, LogFormat, LogLevel};
