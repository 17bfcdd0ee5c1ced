//! Error types for every stage of a diagnostic request.
//!
//! Errors are grouped by the component that raises them:
//! - **Probe errors**: target validation and external command execution
//! - **TLS errors**: certificate inspection
//! - **Database errors**: result persistence (never surfaced to callers)
//! - **Initialization errors**: startup only

mod types;

// Re-export public API
pub use types::{DatabaseError, InitializationError, ProbeError, TlsError};
