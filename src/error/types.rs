//! Error types for the peerauth library.

use thiserror::Error;

/// Main error type for authentication operations.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Configuration-related errors. Fatal: a service detecting one of these
    /// at startup must not begin accepting requests.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// A request was rejected by the authentication pipeline.
    #[error("Authentication rejected: {kind}")]
    Rejected { kind: RejectionKind },

    /// The replay store could not be reached or timed out. Treated as a
    /// rejection (fail-closed), never as an implicit pass.
    #[error("Replay store unavailable: {message}")]
    StoreUnavailable { message: String },
}

/// Per-request rejection reasons.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RejectionKind {
    #[error("Either the service is missing or it has no credentials registered: {service}")]
    UnknownService { service: String },

    #[error("A nonce is required to complete the request authentication")]
    NonceMissing,

    #[error("The nonce of the request is of an invalid format: {message}")]
    NonceFormat { message: String },

    #[error("The nonce of the request is expired")]
    NonceExpired,

    #[error("The nonce of the request has already been used")]
    NonceReused,

    #[error("Unsupported signature algorithm: {algorithm}")]
    UnsupportedAlgorithm { algorithm: String },

    #[error("HMAC signature does not match with the one provided in the request")]
    SignatureMismatch,
}

impl AuthError {
    /// Shorthand for building a rejection error.
    pub fn rejected(kind: RejectionKind) -> Self {
        AuthError::Rejected { kind }
    }

    /// Returns the rejection kind if this error is a per-request rejection.
    pub fn rejection(&self) -> Option<&RejectionKind> {
        match self {
            AuthError::Rejected { kind } => Some(kind),
            _ => None,
        }
    }
}

/// Result type alias for authentication operations.
pub type AuthResult<T> = Result<T, AuthError>;
