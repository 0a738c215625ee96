//! Outbound auth-header generation for calling peer services that run the
//! same protocol.

use std::sync::Arc;

use crate::error::{AuthError, AuthResult, RejectionKind};
use crate::protocol::{
    AuthVersion, HEADER_ALGO, HEADER_NONCE, HEADER_SERVICE, HEADER_SIGNATURE, HEADER_VERSION,
};

use super::nonce::Nonce;
use super::registry::CredentialRegistry;
use super::signature::{self, Algorithm};

/// Generates the authentication headers for outbound calls to one peer
/// service.
///
/// Each call gets a freshly created nonce and a signature over the same
/// canonical form the peer will verify. The user-identification header is
/// never emitted here; attaching it is up to the caller.
pub struct HeaderGenerator {
    registry: Arc<CredentialRegistry>,
    service: String,
    algorithm: Algorithm,
}

impl HeaderGenerator {
    /// Create a generator for the given target service, signing with the
    /// protocol default algorithm.
    pub fn new(service: impl Into<String>, registry: Arc<CredentialRegistry>) -> AuthResult<Self> {
        Self::with_algorithm(service, registry, Algorithm::default())
    }

    /// Create a generator signing with a specific algorithm.
    pub fn with_algorithm(
        service: impl Into<String>,
        registry: Arc<CredentialRegistry>,
        algorithm: Algorithm,
    ) -> AuthResult<Self> {
        let service = service.into();
        if registry.credential(&service).is_none() {
            return Err(AuthError::rejected(RejectionKind::UnknownService {
                service,
            }));
        }

        Ok(Self {
            registry,
            service,
            algorithm,
        })
    }

    /// The target service this generator signs for.
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Generate the auth headers for one outbound request.
    ///
    /// `path` is the URL path with a leading forward-slash, e.g.
    /// `/api/v1/doctors`.
    pub fn generate(&self, method: &str, path: &str) -> AuthResult<Vec<(&'static str, String)>> {
        let credential = self.registry.credential(&self.service).ok_or_else(|| {
            AuthError::rejected(RejectionKind::UnknownService {
                service: self.service.clone(),
            })
        })?;

        let nonce = Nonce::create_string();
        let signature = signature::sign(method, path, Some(&nonce), &credential.secret, self.algorithm);

        let client_name = self
            .registry
            .client_name(&self.service)
            .unwrap_or(&self.service)
            .to_string();

        Ok(vec![
            (HEADER_SERVICE, client_name),
            (HEADER_NONCE, nonce),
            (HEADER_SIGNATURE, signature),
            (HEADER_ALGO, self.algorithm.as_str().to_string()),
            (HEADER_VERSION, AuthVersion::V4.as_str().to_string()),
        ])
    }
}
