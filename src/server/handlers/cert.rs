//! `/cert` handler.

use axum::extract::Query;
use axum::Json;

use super::super::types::CertQuery;
use crate::error_handling::TlsError;
use crate::models::CertificateSummary;
use crate::tls::inspect;

/// `GET /cert?host=...&port=...`
pub async fn cert_handler(
    Query(query): Query<CertQuery>,
) -> Result<Json<CertificateSummary>, TlsError> {
    inspect(&query.host, query.port).await.map(Json)
}
