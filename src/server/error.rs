//! Mapping of domain errors to HTTP responses.
//!
//! Every error becomes `{"detail": "<message>"}` with a status chosen by kind:
//! invalid input is the caller's fault (400), a command that ran too long is a
//! timeout (408), and anything else is a server-side failure (500).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::error_handling::{ProbeError, TlsError};

fn detail(status: StatusCode, message: String) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

impl ProbeError {
    /// HTTP status reported for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProbeError::InvalidTarget(_) => StatusCode::BAD_REQUEST,
            ProbeError::Timeout { .. } => StatusCode::REQUEST_TIMEOUT,
            ProbeError::Execution(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ProbeError {
    fn into_response(self) -> Response {
        detail(self.status_code(), self.to_string())
    }
}

impl IntoResponse for TlsError {
    fn into_response(self) -> Response {
        detail(StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
    }
}
