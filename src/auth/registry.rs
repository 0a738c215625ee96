//! Registry of trusted peer services and their signing credentials.

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::{AuthError, AuthResult};

/// Whether a service must send a nonce with every request.
///
/// `Optional` exists to help services transition to enforced nonce usage;
/// new integrations should always be `Required`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NonceCompliance {
    #[default]
    Required,
    Optional,
}

/// Signing credentials for a single trusted peer service.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceCredential {
    /// The service's HMAC signing secret. Must be non-empty.
    pub secret: String,

    /// The name with which this peer identifies *us*. Used when generating
    /// outbound auth headers for calls to this peer; falls back to the
    /// registry-wide default client name.
    #[serde(default)]
    pub client_name: Option<String>,

    /// Whether requests from this service must carry a nonce.
    #[serde(default)]
    pub nonce_compliance: NonceCompliance,
}

/// Immutable mapping of service identifier to credentials.
///
/// Built once from configuration at process start and passed by handle to
/// the authenticator; read-only afterwards, so it needs no synchronization.
#[derive(Debug)]
pub struct CredentialRegistry {
    keys: HashMap<String, ServiceCredential>,
    default_client_name: Option<String>,
}

impl CredentialRegistry {
    /// Build a registry, validating every credential.
    ///
    /// A service with an empty secret is a fatal configuration error: the
    /// consuming service must not start with it.
    pub fn new(
        keys: HashMap<String, ServiceCredential>,
        default_client_name: Option<String>,
    ) -> AuthResult<Self> {
        for (service, credential) in &keys {
            if credential.secret.trim().is_empty() {
                return Err(AuthError::Config {
                    message: format!("service '{service}' does not have a secret"),
                });
            }
        }

        Ok(Self {
            keys,
            default_client_name,
        })
    }

    /// Look up the credential for a service.
    pub fn credential(&self, service: &str) -> Option<&ServiceCredential> {
        self.keys.get(service)
    }

    /// The name with which the given peer service identifies us, for use in
    /// outbound auth headers. Per-credential client name wins over the
    /// registry-wide default.
    pub fn client_name(&self, service: &str) -> Option<&str> {
        self.credential(service)
            .and_then(|c| c.client_name.as_deref())
            .or(self.default_client_name.as_deref())
    }

    /// Number of registered services.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether no services are registered.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
