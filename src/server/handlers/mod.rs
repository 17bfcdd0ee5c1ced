//! HTTP handlers.

mod cert;
mod probe;
mod status;

pub use cert::cert_handler;
pub use probe::{curl_handler, ping_handler};
pub use status::{format_uptime, status_handler};
