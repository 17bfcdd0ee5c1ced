// Shared helpers for the HTTP integration tests.
//
// Each test gets its own server on an ephemeral loopback port and a handle
// that stops it when dropped.

use std::net::SocketAddr;

use netdiag::server::{serve, AppState, PodMetadata};
use netdiag::storage::ResultStore;
use tokio::sync::oneshot;

/// A running server; shuts down when dropped.
pub struct TestServer {
    pub addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

#[allow(dead_code)] // Used by other test files
pub fn unknown_metadata() -> PodMetadata {
    PodMetadata {
        pod_name: "unknown".to_string(),
        namespace: "unknown".to_string(),
        node_name: "unknown".to_string(),
    }
}

/// Starts a server with the given store and metadata.
pub async fn spawn_server(store: ResultStore, metadata: PodMetadata) -> TestServer {
    netdiag::initialization::init_crypto_provider();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("listener has an address");
    let (tx, rx) = oneshot::channel::<()>();

    let state = AppState::new(store, metadata);
    tokio::spawn(async move {
        let _ = serve(listener, state, async {
            let _ = rx.await;
        })
        .await;
    });

    TestServer {
        addr,
        shutdown: Some(tx),
    }
}

/// Body returned by [`spawn_http_responder`].
#[allow(dead_code)] // Used by other test files
pub const RESPONDER_BODY: &str = "netdiag-ok";

/// Starts a loopback HTTP server that answers every request with
/// [`RESPONDER_BODY`], returning its port.
#[allow(dead_code)] // Used by other test files
pub async fn spawn_http_responder() -> u16 {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind responder");
    let port = listener.local_addr().expect("responder has an address").port();

    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            tokio::spawn(async move {
                // Requests from curl fit in one read; the body is ignored
                let mut buf = [0u8; 4096];
                let _ = stream.read(&mut buf).await;
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    RESPONDER_BODY.len(),
                    RESPONDER_BODY
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            });
        }
    });
    port
}
