//! # peerauth
//!
//! Shared-secret HMAC authentication for service-to-service API calls, with
//! replay protection via single-use nonces. Backend services use it to
//! mutually authenticate trusted peers without a centralized identity
//! provider.
//!
//! The pipeline: a [`protocol::SigningRequest`] is resolved against the
//! [`auth::CredentialRegistry`], its nonce checked against a
//! [`auth::ReplayStore`], and its signature verified against the canonical
//! signing string, yielding an authenticated identity or a typed rejection.
//!
//! ```no_run
//! use std::sync::Arc;
//! use peerauth::auth::{Authenticator, CacheReplayStore, CredentialRegistry};
//! use peerauth::config::Settings;
//!
//! # async fn run() -> peerauth::error::AuthResult<()> {
//! let settings = Settings::load("/etc/peerauth.toml")?;
//! let registry = Arc::new(CredentialRegistry::new(
//!     settings.security.keys.clone(),
//!     settings.security.default_client_name.clone(),
//! )?);
//! let store = Arc::new(CacheReplayStore::new(
//!     settings.retention_ttl(),
//!     settings.replay.max_entries,
//! ));
//! let authenticator = Authenticator::new(
//!     registry,
//!     store,
//!     settings.nonce_ttl(),
//!     settings.store_timeout(),
//! )?;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod protocol;
