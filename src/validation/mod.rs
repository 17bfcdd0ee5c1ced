//! Probe target validation.
//!
//! Targets end up as a single argv element of `ping` or `curl`, never inside a
//! shell string. The checks here are an allow-list of lexical shapes that keeps
//! shell metacharacters, whitespace and option-like strings (`-x`) out of that
//! argument. They do not check that an address is routable or well formed.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error_handling::ProbeError;

/// Dotted digit groups, anchored at the start only.
///
/// Octets are not range-checked and trailing text is not rejected, so
/// `"999.1"` and `"1.2.3.4/x"` both pass. Any input accepted here still
/// begins with a digit, which is what keeps it from being read as an option.
static IPV4_LIKE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([1-2]?[0-9]{1,2}\.?)+").expect("IPv4 pattern is valid")
});

static HOSTNAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9.]+$").expect("hostname pattern is valid"));

static URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://[a-z0-9.]+\.[a-z]+$").expect("URL pattern is valid")
});

/// Which accepted shape a target matched (first match wins).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetShape {
    /// Starts with dotted digit groups
    Ipv4Like,
    /// Lowercase letters, digits and dots
    Hostname,
    /// `http://` or `https://` followed by a dotted lowercase host
    Url,
}

impl TargetShape {
    /// Classifies `raw`, returning `None` when no shape matches.
    pub fn classify(raw: &str) -> Option<Self> {
        if IPV4_LIKE.is_match(raw) {
            Some(TargetShape::Ipv4Like)
        } else if HOSTNAME.is_match(raw) {
            Some(TargetShape::Hostname)
        } else if URL.is_match(raw) {
            Some(TargetShape::Url)
        } else {
            None
        }
    }

    /// Short name used in log lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetShape::Ipv4Like => "ipv4",
            TargetShape::Hostname => "hostname",
            TargetShape::Url => "url",
        }
    }
}

/// A target string that passed validation.
///
/// The only way to obtain one is [`ProbeTarget::parse`], so holding a
/// `ProbeTarget` means the string has already been checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeTarget {
    value: String,
    shape: TargetShape,
}

impl ProbeTarget {
    /// Validates `raw` and wraps it unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::InvalidTarget`] carrying the original string when
    /// no accepted shape matches.
    pub fn parse(raw: &str) -> Result<Self, ProbeError> {
        match TargetShape::classify(raw) {
            Some(shape) => Ok(ProbeTarget {
                value: raw.to_string(),
                shape,
            }),
            None => Err(ProbeError::InvalidTarget(raw.to_string())),
        }
    }

    /// The target exactly as the caller sent it.
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// The shape this target matched.
    pub fn shape(&self) -> TargetShape {
        self.shape
    }
}

impl AsRef<str> for ProbeTarget {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for ProbeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// Validates a caller-supplied probe target.
///
/// Equivalent to [`ProbeTarget::parse`].
pub fn validate(raw: &str) -> Result<ProbeTarget, ProbeError> {
    ProbeTarget::parse(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_ipv4_literals() {
        for raw in ["8.8.8.8", "127.0.0.1", "10.0.0.254", "1.1.1.1"] {
            let target = validate(raw).expect("IPv4 literal should be accepted");
            assert_eq!(target.as_str(), raw);
            assert_eq!(target.shape(), TargetShape::Ipv4Like);
        }
    }

    #[test]
    fn test_ipv4_pattern_is_permissive() {
        // Octets are not range-checked and the end is not anchored
        assert!(validate("999.999.999.999").is_ok());
        assert!(validate("1.2.3.4:80").is_ok());
        assert!(validate("42").is_ok());
    }

    #[test]
    fn test_accepts_hostnames() {
        for raw in ["example.com", "localhost", "api.internal.example.org", "host01"] {
            let target = validate(raw).expect("hostname should be accepted");
            assert_eq!(target.as_str(), raw);
            assert_eq!(target.shape(), TargetShape::Hostname);
        }
    }

    #[test]
    fn test_accepts_urls() {
        for raw in ["http://example.com", "https://www.example.org"] {
            let target = validate(raw).expect("URL should be accepted");
            assert_eq!(target.as_str(), raw);
            assert_eq!(target.shape(), TargetShape::Url);
        }
    }

    #[test]
    fn test_rejects_shell_metacharacters() {
        for raw in [
            "bad;rm -rf",
            "example.com && id",
            "$(whoami)",
            "`id`",
            "host|nc",
            "a b",
        ] {
            match validate(raw) {
                Err(ProbeError::InvalidTarget(original)) => assert_eq!(original, raw),
                other => panic!("{raw:?} should be rejected, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_rejects_option_like_targets() {
        assert!(validate("-oProxyCommand=id").is_err());
        assert!(validate("--output").is_err());
    }

    #[test]
    fn test_rejects_uppercase_and_paths() {
        assert!(validate("Example.com").is_err());
        assert!(validate("https://example.com/path").is_err());
        assert!(validate("ftp://example.com").is_err());
        assert!(validate("https://localhost").is_err());
    }

    #[test]
    fn test_rejects_empty_string() {
        assert!(validate("").is_err());
    }

    #[test]
    fn test_rejects_trailing_newline() {
        assert!(validate("example.com\n").is_err());
    }

    #[test]
    fn test_display_round_trips_input() {
        let target = validate("example.com").expect("valid");
        assert_eq!(target.to_string(), "example.com");
        assert_eq!(target.as_ref(), "example.com");
    }
}
