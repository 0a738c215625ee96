//! Request and result types for the authentication pipeline.

use serde::{Deserialize, Serialize};

/// A signed inbound request, as assembled by the transport layer from the
/// request line and auth metadata fields.
///
/// The signature covers the canonical signing string derived from the
/// method, path and (if present) nonce. Each instance is consumed once by
/// [`crate::auth::Authenticator::authenticate`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SigningRequest {
    /// HTTP method of the request (e.g. "GET"). Upper-cased when signed.
    pub method: String,

    /// Path component of the request URL, with a leading forward-slash.
    pub path: String,

    /// Identifier of the calling service.
    pub service: String,

    /// Request nonce in `{epoch_seconds}|{salt}` form, if supplied.
    pub nonce: Option<String>,

    /// Identifier of the end user on whose behalf the call is made.
    pub user: Option<String>,

    /// Signature algorithm identifier. Missing means HMAC-SHA1.
    pub algorithm: Option<String>,

    /// Authentication protocol version. Missing or unknown means the latest.
    pub version: Option<String>,

    /// Declared Base64-encoded HMAC signature.
    pub signature: String,
}

impl SigningRequest {
    /// Create a request with the mandatory fields set and everything else
    /// empty.
    pub fn new(
        method: impl Into<String>,
        path: impl Into<String>,
        service: impl Into<String>,
        signature: impl Into<String>,
    ) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            service: service.into(),
            nonce: None,
            user: None,
            algorithm: None,
            version: None,
            signature: signature.into(),
        }
    }

    /// Attach a nonce (builder pattern).
    pub fn with_nonce(mut self, nonce: impl Into<String>) -> Self {
        self.nonce = Some(nonce.into());
        self
    }

    /// Attach a user identifier (builder pattern).
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Declare the signature algorithm (builder pattern).
    pub fn with_algorithm(mut self, algorithm: impl Into<String>) -> Self {
        self.algorithm = Some(algorithm.into());
        self
    }

    /// Declare the auth protocol version (builder pattern).
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// The nonce, treating an empty string the same as an absent one.
    pub fn nonce_text(&self) -> Option<&str> {
        self.nonce.as_deref().filter(|n| !n.is_empty())
    }
}

/// Authentication protocol versions.
///
/// Different versions calculate the request signature differently. The
/// version tag on the request selects the verification strategy; unknown or
/// missing versions fall back to the latest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthVersion {
    /// Legacy version, retained only for wire compatibility.
    V2,
    /// Legacy version, retained only for wire compatibility.
    V3,
    /// Current version: HMAC over the canonical signing string.
    V4,
}

impl AuthVersion {
    /// Parse a wire version tag. Unknown or absent tags resolve to the
    /// latest version.
    pub fn from_wire(tag: Option<&str>) -> Self {
        match tag {
            Some("V2") => AuthVersion::V2,
            Some("V3") => AuthVersion::V3,
            _ => AuthVersion::V4,
        }
    }

    /// The wire representation of this version.
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthVersion::V2 => "V2",
            AuthVersion::V3 => "V3",
            AuthVersion::V4 => "V4",
        }
    }
}

/// The outcome of a successful authentication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authentication {
    /// The authenticated service identity.
    pub service: String,

    /// End-user identifier carried on the request, if any. Passed through
    /// verbatim; this crate does not validate users.
    pub user: Option<String>,

    /// Always true for a returned value; rejections are errors.
    pub authenticated: bool,
}
