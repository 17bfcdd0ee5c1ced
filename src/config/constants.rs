//! Configuration constants.
//!
//! Timeouts and fixed command parameters used by the diagnostic endpoints.

/// Wall-clock limit for an external diagnostic command, in seconds.
pub const COMMAND_TIMEOUT_SECS: u64 = 10;

/// Number of echo requests sent by the ping probe (`ping -c`).
pub const PING_COUNT: &str = "4";

// Network operation timeouts
/// TCP connection timeout for certificate inspection, in seconds
pub const TCP_CONNECT_TIMEOUT_SECS: u64 = 10;
/// TLS handshake timeout for certificate inspection, in seconds
pub const TLS_HANDSHAKE_TIMEOUT_SECS: u64 = 10;

/// Port used by `/cert` when the caller does not supply one.
pub const DEFAULT_TLS_PORT: u16 = 443;

/// Default listen address for the HTTP server.
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8000";

/// How long `/status` waits for its own hostname to resolve, in seconds.
pub const HOSTNAME_LOOKUP_TIMEOUT_SECS: u64 = 2;

/// Value reported for pod metadata that is not configured.
pub const UNKNOWN: &str = "unknown";

// Result store
/// Table that receives persisted command results
pub const RESULTS_TABLE: &str = "command_results";
/// How long a save waits for a pooled connection before giving up
pub const DB_ACQUIRE_TIMEOUT_SECS: u64 = 5;
/// Upper bound on pooled database connections
pub const DB_MAX_CONNECTIONS: u32 = 5;
