//! Configuration settings for the authentication library.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::auth::ServiceCredential;
use crate::error::{AuthError, AuthResult};

/// Top-level configuration, loaded from a TOML file by the consuming
/// service at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub security: SecurityConfig,
    #[serde(default)]
    pub replay: ReplayConfig,
}

/// Security configuration: trusted peers and nonce policy.
#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    /// Service identifier to credential map.
    #[serde(default)]
    pub keys: HashMap<String, ServiceCredential>,

    /// Time-to-live for request nonces, in seconds. Must be strictly less
    /// than the replay store retention so a nonce expires before its store
    /// entry does.
    #[serde(default = "default_nonce_ttl")]
    pub nonce_ttl_seconds: u64,

    /// Our service's name as understood by the peers we call. Individual
    /// credentials may override it.
    #[serde(default)]
    pub default_client_name: Option<String>,

    /// Upper bound on a single replay-store round-trip, in seconds.
    #[serde(default = "default_store_timeout")]
    pub store_timeout_seconds: u64,
}

/// Replay store configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ReplayConfig {
    /// How long an accepted nonce is retained, in seconds. Must be at least
    /// twice the nonce ttl.
    #[serde(default = "default_retention_ttl")]
    pub retention_ttl_seconds: u64,

    /// Maximum number of nonces held at a time.
    #[serde(default = "default_max_entries")]
    pub max_entries: u64,
}

fn default_nonce_ttl() -> u64 {
    10
}

fn default_store_timeout() -> u64 {
    5
}

fn default_retention_ttl() -> u64 {
    300
}

fn default_max_entries() -> u64 {
    100_000
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            retention_ttl_seconds: default_retention_ttl(),
            max_entries: default_max_entries(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> AuthResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| AuthError::Config {
            message: format!("failed to read config file '{}': {}", path.display(), e),
        })?;

        let settings: Settings = toml::from_str(&content).map_err(|e| AuthError::Config {
            message: format!("failed to parse config file '{}': {}", path.display(), e),
        })?;

        settings.validate()?;

        Ok(settings)
    }

    /// Validate cross-field constraints.
    ///
    /// Credential-level validation (non-empty secrets) happens when the
    /// registry is built; the retention safety margin is re-checked against
    /// the actual store by [`crate::auth::Authenticator::new`].
    pub fn validate(&self) -> AuthResult<()> {
        // Same range the nonce itself enforces; catching it here turns a
        // per-request parse failure into a fatal startup error.
        if self.security.nonce_ttl_seconds == 0 || self.security.nonce_ttl_seconds > 3600 {
            return Err(AuthError::Config {
                message: format!(
                    "nonce_ttl_seconds ({}) must be between 1 and 3600",
                    self.security.nonce_ttl_seconds
                ),
            });
        }

        if self.replay.retention_ttl_seconds < self.security.nonce_ttl_seconds * 2 {
            return Err(AuthError::Config {
                message: format!(
                    "retention_ttl_seconds ({}) must be at least twice nonce_ttl_seconds ({})",
                    self.replay.retention_ttl_seconds, self.security.nonce_ttl_seconds
                ),
            });
        }

        Ok(())
    }

    /// The configured nonce time-to-live.
    pub fn nonce_ttl(&self) -> Duration {
        Duration::from_secs(self.security.nonce_ttl_seconds)
    }

    /// The configured replay-store access timeout.
    pub fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.security.store_timeout_seconds)
    }

    /// The configured replay retention ttl.
    pub fn retention_ttl(&self) -> Duration {
        Duration::from_secs(self.replay.retention_ttl_seconds)
    }
}
