//! TLS certificate inspection.
//!
//! Connects to a TLS endpoint, completes a fully verified handshake and
//! summarizes the leaf certificate the server presented:
//! - Subject and issuer (RFC 4514)
//! - Validity period and days until expiry
//! - Subject Alternative Names (DNS names only)
//! - SHA-1 and SHA-256 fingerprints
//!
//! The handshake trusts the platform's certificate store, loaded once through
//! `rustls-native-certs` (which honours `SSL_CERT_FILE` and `SSL_CERT_DIR`).
//! The bundled webpki roots are used only when the platform store is empty.
//! There is no option to skip verification: an untrusted chain or a name
//! mismatch is an error.

mod extract;

use std::sync::{Arc, LazyLock};
use std::time::Duration;

use chrono::Utc;
use log::{debug, error, info, warn};
use rustls::pki_types::ServerName;
use tokio::net::TcpStream;
use tokio_rustls::rustls::{ClientConfig, RootCertStore};
use tokio_rustls::TlsConnector;

use crate::config::{TCP_CONNECT_TIMEOUT_SECS, TLS_HANDSHAKE_TIMEOUT_SECS};
use crate::error_handling::TlsError;
use crate::models::CertificateSummary;

pub use extract::summarize_der;

/// Builds the root store from the platform's trusted certificates.
fn platform_roots() -> RootCertStore {
    let mut roots = RootCertStore::empty();
    let native = rustls_native_certs::load_native_certs();
    for e in &native.errors {
        warn!("Problem loading platform certificates: {e}");
    }
    let (added, ignored) = roots.add_parsable_certificates(native.certs);
    debug!("Loaded {added} platform root certificate(s), ignored {ignored}");

    if roots.is_empty() {
        warn!("No usable platform root certificates, using bundled webpki roots");
        roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    }
    roots
}

/// Shared client configuration; the trust store is read on first use.
static CLIENT_CONFIG: LazyLock<Arc<ClientConfig>> = LazyLock::new(|| {
    Arc::new(
        ClientConfig::builder()
            .with_root_certificates(platform_roots())
            .with_no_client_auth(),
    )
});

/// Fetches and summarizes the certificate served at `host:port`.
///
/// `host` is used both to connect and as the SNI value, and the chain is
/// verified against it. A single attempt is made.
///
/// # Errors
///
/// Returns [`TlsError`] if:
/// - `host` is not a valid server name
/// - DNS resolution or the TCP connection fails or times out
/// - the handshake fails, times out, or the certificate is not trusted
/// - the server presents no certificate or it cannot be parsed
pub async fn inspect(host: &str, port: u16) -> Result<CertificateSummary, TlsError> {
    debug!("Attempting to get certificate for {host}:{port}");

    let server_name = ServerName::try_from(host.to_string()).map_err(|e| {
        error!("Invalid server name {host}: {e}");
        TlsError::InvalidServerName {
            host: host.to_string(),
            reason: e.to_string(),
        }
    })?;

    let sock = match tokio::time::timeout(
        Duration::from_secs(TCP_CONNECT_TIMEOUT_SECS),
        TcpStream::connect((host, port)),
    )
    .await
    {
        Ok(Ok(sock)) => sock,
        Ok(Err(e)) => {
            error!("Failed to connect to {host}:{port} - {e}");
            return Err(TlsError::Connect {
                host: host.to_string(),
                port,
                reason: e.to_string(),
            });
        }
        Err(_) => {
            error!("TCP connection timeout for {host}:{port}");
            return Err(TlsError::ConnectTimeout {
                host: host.to_string(),
                port,
                seconds: TCP_CONNECT_TIMEOUT_SECS,
            });
        }
    };

    let connector = TlsConnector::from(Arc::clone(&CLIENT_CONFIG));
    let tls_stream = match tokio::time::timeout(
        Duration::from_secs(TLS_HANDSHAKE_TIMEOUT_SECS),
        connector.connect(server_name, sock),
    )
    .await
    {
        Ok(Ok(stream)) => stream,
        Ok(Err(e)) => {
            error!("TLS connection failed for {host}:{port}: {e}");
            return Err(TlsError::Handshake {
                host: host.to_string(),
                port,
                reason: e.to_string(),
            });
        }
        Err(_) => {
            error!("TLS handshake timeout for {host}:{port}");
            return Err(TlsError::HandshakeTimeout {
                host: host.to_string(),
                port,
                seconds: TLS_HANDSHAKE_TIMEOUT_SECS,
            });
        }
    };

    let leaf = tls_stream
        .get_ref()
        .1
        .peer_certificates()
        .and_then(|certs| certs.first())
        .ok_or_else(|| TlsError::NoPeerCertificate {
            host: host.to_string(),
            port,
        })?;

    let summary = summarize_der(leaf.as_ref(), Utc::now())?;
    info!(
        "Certificate for {host}:{port} expires in {} day(s)",
        summary.days_until_expiry
    );
    Ok(summary)
}
