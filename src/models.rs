//! Response payloads shared by the endpoints and the result store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// Diagnostic commands the service knows how to run.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CommandKind {
    /// `ping -q -c 4 <target>`
    Ping,
    /// `curl -s <target>`
    Curl,
}

/// Output of one diagnostic command run.
///
/// `target` is the string the caller sent, kept verbatim for display and
/// storage. `output` is stdout, or stderr when stdout was empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandResult {
    /// Which command ran
    pub command: CommandKind,
    /// Target as sent by the caller
    pub target: String,
    /// Captured output
    pub output: String,
    /// When the command finished
    pub created_at: DateTime<Utc>,
}

/// SHA-1 and SHA-256 digests of a certificate's DER encoding, lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fingerprints {
    /// SHA-1, 40 hex characters
    pub sha1: String,
    /// SHA-256, 64 hex characters
    pub sha256: String,
}

/// Summary of the leaf certificate presented by a TLS server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CertificateSummary {
    /// Subject distinguished name (RFC 4514)
    pub subject: String,
    /// Issuer distinguished name (RFC 4514)
    pub issuer: String,
    /// Start of validity (notBefore)
    pub valid_from: DateTime<Utc>,
    /// End of validity (notAfter)
    pub valid_until: DateTime<Utc>,
    /// Whole days left until `valid_until`, negative once expired
    pub days_until_expiry: i64,
    /// DNS names from the Subject Alternative Name extension, in certificate order
    pub subject_alternative_names: Vec<String>,
    /// Digests of the DER encoding
    pub fingerprints: Fingerprints,
}

/// JSON body of `GET /status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    /// Always `"ok"`
    pub status: String,
    /// First address this host's name resolves to, or `"unknown"`
    pub ip_address: String,
    /// Time since startup, e.g. `"1 day, 2:03:04"`
    pub uptime: String,
    /// Pod name from the environment
    pub pod_name: String,
    /// Pod namespace from the environment
    pub namespace: String,
    /// Node the pod is scheduled on
    pub node_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_command_kind_names_are_lowercase() {
        assert_eq!(CommandKind::Ping.to_string(), "ping");
        assert_eq!(CommandKind::Curl.as_ref(), "curl");
        assert_eq!(CommandKind::from_str("ping").ok(), Some(CommandKind::Ping));
        assert!(CommandKind::from_str("traceroute").is_err());
        assert_eq!(CommandKind::iter().count(), 2);
    }

    #[test]
    fn test_command_result_json_shape() {
        let created_at = DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z")
            .expect("valid timestamp")
            .with_timezone(&Utc);
        let result = CommandResult {
            command: CommandKind::Curl,
            target: "example.com".to_string(),
            output: "<html></html>".to_string(),
            created_at,
        };

        let json = serde_json::to_value(&result).expect("serializes");
        assert_eq!(json["command"], "curl");
        assert_eq!(json["target"], "example.com");
        assert_eq!(json["output"], "<html></html>");
        assert_eq!(json["created_at"], "2024-01-01T00:00:00Z");
    }

    #[test]
    fn test_certificate_summary_nests_fingerprints() {
        let ts = DateTime::parse_from_rfc3339("2030-06-01T12:00:00Z")
            .expect("valid timestamp")
            .with_timezone(&Utc);
        let summary = CertificateSummary {
            subject: "CN=example.com".to_string(),
            issuer: "CN=Example CA,O=Example".to_string(),
            valid_from: ts,
            valid_until: ts,
            days_until_expiry: -3,
            subject_alternative_names: vec![],
            fingerprints: Fingerprints {
                sha1: "ab".to_string(),
                sha256: "cd".to_string(),
            },
        };

        let json = serde_json::to_value(&summary).expect("serializes");
        assert_eq!(json["days_until_expiry"], -3);
        assert_eq!(json["fingerprints"]["sha1"], "ab");
        assert_eq!(json["fingerprints"]["sha256"], "cd");
        assert!(json["subject_alternative_names"]
            .as_array()
            .expect("array")
            .is_empty());
    }
}
