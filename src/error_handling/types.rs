//! Error type definitions.

use log::SetLoggerError;
use thiserror::Error;

/// Errors raised while validating a target or running a diagnostic command.
#[derive(Error, Debug)]
pub enum ProbeError {
    /// The caller-supplied target matched none of the accepted shapes.
    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    /// The external command did not finish within its time limit.
    #[error("Command timed out")]
    Timeout {
        /// Program that was killed
        program: String,
        /// Limit that was exceeded
        seconds: u64,
    },

    /// The external command could not be started or awaited.
    #[error("Command execution failed: {0}")]
    Execution(String),
}

/// Errors raised while fetching and parsing a peer certificate.
#[derive(Error, Debug)]
pub enum TlsError {
    /// The host cannot be used as a TLS server name.
    #[error("Invalid server name {host}: {reason}")]
    InvalidServerName {
        /// Rejected host
        host: String,
        /// Why it was rejected
        reason: String,
    },

    /// Name resolution or TCP connect failed.
    #[error("Failed to connect to {host}:{port}: {reason}")]
    Connect {
        /// Target host
        host: String,
        /// Target port
        port: u16,
        /// Resolver or socket error text
        reason: String,
    },

    /// The TCP connection was not established in time.
    #[error("TCP connection timeout for {host}:{port} ({seconds}s)")]
    ConnectTimeout {
        /// Target host
        host: String,
        /// Target port
        port: u16,
        /// Limit that was exceeded
        seconds: u64,
    },

    /// Handshake failed, including untrusted or mismatched certificates.
    #[error("TLS handshake failed for {host}:{port}: {reason}")]
    Handshake {
        /// Target host
        host: String,
        /// Target port
        port: u16,
        /// rustls error text
        reason: String,
    },

    /// The handshake did not complete in time.
    #[error("TLS handshake timeout for {host}:{port} ({seconds}s)")]
    HandshakeTimeout {
        /// Target host
        host: String,
        /// Target port
        port: u16,
        /// Limit that was exceeded
        seconds: u64,
    },

    /// The handshake completed without a server certificate.
    #[error("{host}:{port} presented no certificate")]
    NoPeerCertificate {
        /// Target host
        host: String,
        /// Target port
        port: u16,
    },

    /// The leaf certificate could not be decoded.
    #[error("Failed to parse certificate: {0}")]
    Parse(String),
}

/// Error types for database operations.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Persistence was requested without a connection string.
    #[error("SAVE_TO_DB is enabled but DATABASE_URL is not set")]
    MissingUrl,

    /// The connection string names a backend this build cannot talk to.
    #[error("Unsupported database URL scheme: {0}")]
    UnsupportedScheme(String),

    /// SQL execution error.
    #[error("SQL error: {0}")]
    SqlError(#[from] sqlx::Error),
}

/// Error types for startup failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error binding the HTTP listener.
    #[error("Failed to bind {addr}: {source}")]
    BindError {
        /// Address that could not be bound
        addr: String,
        /// Underlying socket error
        #[source]
        source: std::io::Error,
    },
}
