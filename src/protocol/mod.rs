//! Wire-level types for the authentication protocol.
//!
//! Defines the fixed request metadata field names and the structured request
//! consumed by the authenticator. Parsing transport headers into a
//! [`SigningRequest`] is the job of the transport integration, not this crate.

mod request;

pub use request::*;

/// Metadata field carrying the calling service's identifier.
pub const HEADER_SERVICE: &str = "X-AUTH-SERVICE";

/// Metadata field carrying the request nonce (optional).
pub const HEADER_NONCE: &str = "X-AUTH-NONCE";

/// Metadata field carrying the HMAC signature.
pub const HEADER_SIGNATURE: &str = "X-AUTH-SIGNATURE";

/// Metadata field identifying the end user on whose behalf the call is made.
pub const HEADER_USER: &str = "X-AUTH-USER";

/// Metadata field naming the signature algorithm.
pub const HEADER_ALGO: &str = "X-AUTH-ALGO";

/// Metadata field naming the authentication protocol version.
pub const HEADER_VERSION: &str = "X-AUTH-VERSION";
