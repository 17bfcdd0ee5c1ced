//! Certificate extraction utilities.

use chrono::{DateTime, Utc};
use sha1::Sha1;
use sha2::{Digest, Sha256};
use x509_parser::certificate::X509Certificate;
use x509_parser::error::X509Error;
use x509_parser::extensions::GeneralName;
use x509_parser::time::ASN1Time;
use x509_parser::x509::{AttributeTypeAndValue, X509Name};

use crate::error_handling::TlsError;
use crate::models::{CertificateSummary, Fingerprints};

const SECONDS_PER_DAY: i64 = 86_400;

/// Extracts Subject Alternative Names (SANs) from an X.509 certificate.
///
/// Only DNS names are kept, in certificate order. IP addresses, email
/// addresses and other name forms are skipped.
///
/// # Returns
///
/// `Ok(vec![])` when the extension is absent, or an error if it is present
/// but malformed.
pub(crate) fn extract_certificate_sans(
    cert: &X509Certificate<'_>,
) -> Result<Vec<String>, X509Error> {
    let Some(san) = cert.subject_alternative_name()? else {
        return Ok(Vec::new());
    };

    Ok(san
        .value
        .general_names
        .iter()
        .filter_map(|name| match name {
            GeneralName::DNSName(dns_name) => Some(dns_name.to_string()),
            _ => None,
        })
        .collect())
}

/// Short names RFC 4514 defines for attribute types; anything else is written
/// as a dotted OID.
fn attribute_short_name(dotted: String) -> String {
    let short = match dotted.as_str() {
        "2.5.4.3" => "CN",
        "2.5.4.7" => "L",
        "2.5.4.8" => "ST",
        "2.5.4.10" => "O",
        "2.5.4.11" => "OU",
        "2.5.4.6" => "C",
        "2.5.4.9" => "STREET",
        "0.9.2342.19200300.100.1.25" => "DC",
        "0.9.2342.19200300.100.1.1" => "UID",
        _ => return dotted,
    };
    short.to_string()
}

/// Escapes an attribute value for use in an RFC 4514 string.
fn escape_attribute_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    let last = value.chars().count().saturating_sub(1);

    for (i, c) in value.chars().enumerate() {
        match c {
            '\\' | '"' | '+' | ',' | ';' | '<' | '>' => {
                escaped.push('\\');
                escaped.push(c);
            }
            '\0' => escaped.push_str("\\00"),
            '#' if i == 0 => escaped.push_str("\\#"),
            ' ' if i == 0 || i == last => escaped.push_str("\\ "),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn format_attribute(atv: &AttributeTypeAndValue<'_>) -> String {
    let value = match atv.as_str() {
        Ok(s) => escape_attribute_value(s),
        // Values that are not strings are written as '#' followed by hex
        Err(_) => format!("#{}", hex::encode(atv.attr_value().as_bytes())),
    };
    format!(
        "{}={}",
        attribute_short_name(atv.attr_type().to_id_string()),
        value
    )
}

/// Formats a distinguished name as an RFC 4514 string.
///
/// RDNs are written most-specific first (the reverse of their encoded order),
/// separated by commas; multi-valued RDNs are joined with `+`.
pub(crate) fn format_rfc4514(name: &X509Name<'_>) -> String {
    let rdns: Vec<String> = name
        .iter_rdn()
        .map(|rdn| {
            rdn.iter()
                .map(format_attribute)
                .collect::<Vec<_>>()
                .join("+")
        })
        .collect();

    rdns.into_iter().rev().collect::<Vec<_>>().join(",")
}

fn asn1_time_to_utc(time: &ASN1Time, field: &str) -> Result<DateTime<Utc>, TlsError> {
    DateTime::<Utc>::from_timestamp(time.timestamp(), 0)
        .ok_or_else(|| TlsError::Parse(format!("{field} is out of range")))
}

/// Hex-encoded SHA-1 and SHA-256 digests of `der`.
pub(crate) fn fingerprints(der: &[u8]) -> Fingerprints {
    Fingerprints {
        sha1: hex::encode(Sha1::digest(der)),
        sha256: hex::encode(Sha256::digest(der)),
    }
}

/// Whole days from `now` until `not_after`, rounded toward negative infinity.
///
/// A certificate that expired half a day ago reports `-1`, not `0`.
pub(crate) fn days_until(not_after: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (not_after - now)
        .num_milliseconds()
        .div_euclid(SECONDS_PER_DAY * 1000)
}

/// Builds a [`CertificateSummary`] from a DER-encoded certificate.
///
/// Subject, issuer and validity must parse or the whole summary fails. A
/// missing or malformed SAN extension only yields an empty name list.
pub fn summarize_der(der: &[u8], now: DateTime<Utc>) -> Result<CertificateSummary, TlsError> {
    let (_, cert) =
        x509_parser::parse_x509_certificate(der).map_err(|e| TlsError::Parse(e.to_string()))?;

    let subject = format_rfc4514(cert.subject());
    let issuer = format_rfc4514(cert.issuer());
    let valid_from = asn1_time_to_utc(&cert.validity().not_before, "notBefore")?;
    let valid_until = asn1_time_to_utc(&cert.validity().not_after, "notAfter")?;

    let subject_alternative_names = match extract_certificate_sans(&cert) {
        Ok(sans) => sans,
        Err(e) => {
            log::debug!("Ignoring unreadable SAN extension for {subject}: {e}");
            Vec::new()
        }
    };

    Ok(CertificateSummary {
        subject,
        issuer,
        valid_from,
        valid_until,
        days_until_expiry: days_until(valid_until, now),
        subject_alternative_names,
        fingerprints: fingerprints(der),
    })
}
