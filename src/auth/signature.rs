//! Canonical signing-string construction and HMAC signature computation.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use ring::hmac;

use crate::error::{AuthError, AuthResult, RejectionKind};

/// Supported keyed-hash algorithms.
///
/// The wire identifier travels in the `X-AUTH-ALGO` field; anything other
/// than the two identifiers below is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Algorithm {
    /// HMAC-SHA1, the protocol default.
    #[default]
    HmacSha1,
    /// HMAC-SHA256.
    HmacSha256,
}

impl Algorithm {
    /// Parse a wire algorithm identifier. A missing identifier means the
    /// protocol default, HMAC-SHA1.
    pub fn from_wire(identifier: Option<&str>) -> AuthResult<Self> {
        match identifier {
            None => Ok(Algorithm::HmacSha1),
            Some("HMAC-SHA1") => Ok(Algorithm::HmacSha1),
            Some("HMAC-SHA256") => Ok(Algorithm::HmacSha256),
            Some(other) => Err(AuthError::rejected(RejectionKind::UnsupportedAlgorithm {
                algorithm: other.to_string(),
            })),
        }
    }

    /// The wire representation of this algorithm.
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::HmacSha1 => "HMAC-SHA1",
            Algorithm::HmacSha256 => "HMAC-SHA256",
        }
    }

    fn hmac_algorithm(&self) -> hmac::Algorithm {
        match self {
            Algorithm::HmacSha1 => hmac::HMAC_SHA1_FOR_LEGACY_USE_ONLY,
            Algorithm::HmacSha256 => hmac::HMAC_SHA256,
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build the canonical signing string for a request.
///
/// Format: `nonce={nonce}&uri={path}&method={METHOD}` when a nonce is
/// present, `uri={path}&method={METHOD}` otherwise. The method is always
/// upper-cased so that signer and verifier agree byte-for-byte.
pub fn canonical_string(method: &str, path: &str, nonce: Option<&str>) -> String {
    let method = method.to_uppercase();
    match nonce.filter(|n| !n.is_empty()) {
        Some(nonce) => format!("nonce={nonce}&uri={path}&method={method}"),
        None => format!("uri={path}&method={method}"),
    }
}

/// Compute the Base64-encoded HMAC signature for a request.
pub fn sign(
    method: &str,
    path: &str,
    nonce: Option<&str>,
    secret: &str,
    algorithm: Algorithm,
) -> String {
    let key = hmac::Key::new(algorithm.hmac_algorithm(), secret.as_bytes());
    let data = canonical_string(method, path, nonce);
    let tag = hmac::sign(&key, data.as_bytes());
    BASE64.encode(tag.as_ref())
}

/// Verify a declared signature against the recomputed one.
///
/// The comparison runs in constant time over the raw MAC bytes. A declared
/// signature that is not valid Base64 can never match.
pub fn verify(
    method: &str,
    path: &str,
    nonce: Option<&str>,
    secret: &str,
    algorithm: Algorithm,
    declared: &str,
) -> bool {
    let declared_bytes = match BASE64.decode(declared) {
        Ok(bytes) => bytes,
        Err(_) => return false,
    };

    let key = hmac::Key::new(algorithm.hmac_algorithm(), secret.as_bytes());
    let data = canonical_string(method, path, nonce);
    hmac::verify(&key, data.as_bytes(), &declared_bytes).is_ok()
}
