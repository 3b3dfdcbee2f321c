//! Payment-provider webhook signature verification.
//!
//! Inbound webhook events carry a signature header of the form
//! `t=<unix-timestamp>,v1=<hex hmac-sha256>`, where the MAC is computed over
//! `"{timestamp}.{raw_body}"` with the shared webhook secret. Verification
//! checks both the MAC (constant time, via [`Mac::verify_slice`]) and the
//! timestamp against a replay tolerance window.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Default replay tolerance for the signature timestamp.
pub const DEFAULT_TOLERANCE_SECS: i64 = 300;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("Malformed signature header")]
    MalformedHeader,

    #[error("Signature timestamp outside tolerance window")]
    TimestampOutOfTolerance,

    #[error("Signature verification failed")]
    InvalidSignature,
}

// ---------------------------------------------------------------------------
// Header parsing
// ---------------------------------------------------------------------------

/// A parsed `t=...,v1=...` signature header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    pub timestamp: i64,
    pub signature: String,
}

/// Parse a signature header into its timestamp and v1 signature parts.
///
/// Unknown `key=value` pairs are ignored so future scheme versions do not
/// break verification of `v1`.
pub fn parse_signature_header(header: &str) -> Result<SignatureHeader, SignatureError> {
    let mut timestamp: Option<i64> = None;
    let mut signature: Option<&str> = None;

    for part in header.split(',') {
        let (key, value) = part
            .trim()
            .split_once('=')
            .ok_or(SignatureError::MalformedHeader)?;
        match key {
            "t" => {
                timestamp = Some(value.parse().map_err(|_| SignatureError::MalformedHeader)?);
            }
            "v1" => signature = Some(value),
            _ => {}
        }
    }

    match (timestamp, signature) {
        (Some(timestamp), Some(sig)) if !sig.is_empty() => Ok(SignatureHeader {
            timestamp,
            signature: sig.to_string(),
        }),
        _ => Err(SignatureError::MalformedHeader),
    }
}

// ---------------------------------------------------------------------------
// Signing / verification
// ---------------------------------------------------------------------------

/// Compute the hex HMAC-SHA256 signature for a timestamped payload.
///
/// The signed message is `"{timestamp}.{body}"`, matching the provider's
/// scheme. Also used by tests to forge valid deliveries.
pub fn compute_signature(secret: &str, timestamp: i64, body: &[u8]) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(body);
    hex_encode(&mac.finalize().into_bytes())
}

/// Verify a raw webhook body against its signature header.
///
/// `now` is the current Unix timestamp; the header timestamp must be within
/// `tolerance_secs` of it (either direction, to absorb clock skew).
pub fn verify_signature(
    secret: &str,
    header: &SignatureHeader,
    body: &[u8],
    now: i64,
    tolerance_secs: i64,
) -> Result<(), SignatureError> {
    if (now - header.timestamp).abs() > tolerance_secs {
        return Err(SignatureError::TimestampOutOfTolerance);
    }

    let expected = hex_decode(&header.signature).ok_or(SignatureError::InvalidSignature)?;

    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(header.timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(body);

    mac.verify_slice(&expected)
        .map_err(|_| SignatureError::InvalidSignature)
}

// ---------------------------------------------------------------------------
// hex helpers (no extra dep)
// ---------------------------------------------------------------------------

/// Encode bytes as a lowercase hex string.
fn hex_encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        out.push_str(&format!("{b:02x}"));
    }
    out
}

/// Decode a hex string into bytes. Returns `None` on odd length or
/// non-hex characters.
fn hex_decode(s: &str) -> Option<Vec<u8>> {
    if s.len() % 2 != 0 {
        return None;
    }
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).ok())
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_test_secret";

    fn signed_header(timestamp: i64, body: &[u8]) -> SignatureHeader {
        SignatureHeader {
            timestamp,
            signature: compute_signature(SECRET, timestamp, body),
        }
    }

    #[test]
    fn valid_signature_verifies() {
        let body = br#"{"type":"checkout.session.completed"}"#;
        let header = signed_header(1_700_000_000, body);

        let result = verify_signature(SECRET, &header, body, 1_700_000_010, 300);
        assert_eq!(result, Ok(()));
    }

    #[test]
    fn tampered_body_fails() {
        let body = br#"{"coins":"500"}"#;
        let header = signed_header(1_700_000_000, body);

        let result = verify_signature(
            SECRET,
            &header,
            br#"{"coins":"50000"}"#,
            1_700_000_010,
            300,
        );
        assert_eq!(result, Err(SignatureError::InvalidSignature));
    }

    #[test]
    fn wrong_secret_fails() {
        let body = b"payload";
        let header = signed_header(1_700_000_000, body);

        let result = verify_signature("other_secret", &header, body, 1_700_000_010, 300);
        assert_eq!(result, Err(SignatureError::InvalidSignature));
    }

    #[test]
    fn stale_timestamp_fails() {
        let body = b"payload";
        let header = signed_header(1_700_000_000, body);

        // 10 minutes later with a 5 minute tolerance.
        let result = verify_signature(SECRET, &header, body, 1_700_000_600, 300);
        assert_eq!(result, Err(SignatureError::TimestampOutOfTolerance));
    }

    #[test]
    fn parse_valid_header() {
        let parsed = parse_signature_header("t=1700000000,v1=abcdef0123").unwrap();
        assert_eq!(parsed.timestamp, 1_700_000_000);
        assert_eq!(parsed.signature, "abcdef0123");
    }

    #[test]
    fn parse_ignores_unknown_pairs() {
        let parsed = parse_signature_header("t=5,v0=legacy,v1=aa").unwrap();
        assert_eq!(parsed.timestamp, 5);
        assert_eq!(parsed.signature, "aa");
    }

    #[test]
    fn parse_rejects_malformed_headers() {
        assert_eq!(
            parse_signature_header("garbage"),
            Err(SignatureError::MalformedHeader)
        );
        assert_eq!(
            parse_signature_header("t=notanumber,v1=aa"),
            Err(SignatureError::MalformedHeader)
        );
        assert_eq!(
            parse_signature_header("v1=aa"),
            Err(SignatureError::MalformedHeader)
        );
        assert_eq!(
            parse_signature_header("t=5"),
            Err(SignatureError::MalformedHeader)
        );
    }

    #[test]
    fn non_hex_signature_fails_verification() {
        let header = SignatureHeader {
            timestamp: 100,
            signature: "zz".to_string(),
        };
        let result = verify_signature(SECRET, &header, b"x", 100, 300);
        assert_eq!(result, Err(SignatureError::InvalidSignature));
    }
}
