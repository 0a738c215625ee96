//! Authentication module.
//!
//! Handles credential lookup, canonical signing and verification, nonce
//! validation, replay tracking, and outbound header generation.

mod coordinator;
mod headers;
mod nonce;
mod registry;
mod replay;
mod signature;

pub use coordinator::Authenticator;
pub use headers::HeaderGenerator;
pub use nonce::Nonce;
pub use registry::{CredentialRegistry, NonceCompliance, ServiceCredential};
pub use replay::{CacheReplayStore, NoopReplayStore, ReplayStore};
pub use signature::{canonical_string, sign, verify, Algorithm};
