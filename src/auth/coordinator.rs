//! The authentication pipeline: registry lookup, nonce validation and replay
//! check, then signature verification.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::{AuthError, AuthResult, RejectionKind};
use crate::protocol::{Authentication, AuthVersion, SigningRequest};

use super::nonce::Nonce;
use super::registry::{CredentialRegistry, NonceCompliance, ServiceCredential};
use super::replay::ReplayStore;
use super::signature::{self, Algorithm};

/// Authenticates inbound service-to-service requests.
///
/// Stateless with respect to the request stream; the replay store is the
/// only shared mutable collaborator. Safe to invoke concurrently.
pub struct Authenticator {
    registry: Arc<CredentialRegistry>,
    replay: Arc<dyn ReplayStore>,
    nonce_ttl: Duration,
    store_timeout: Duration,
}

impl Authenticator {
    /// Create an authenticator.
    ///
    /// Fails with a fatal configuration error when the replay store's
    /// retention ttl is less than twice the nonce ttl: such a store could
    /// forget a nonce while the nonce is still inside its freshness window,
    /// allowing it to be validated more than once.
    pub fn new(
        registry: Arc<CredentialRegistry>,
        replay: Arc<dyn ReplayStore>,
        nonce_ttl: Duration,
        store_timeout: Duration,
    ) -> AuthResult<Self> {
        let retention = replay.retention_ttl();
        if retention < nonce_ttl * 2 {
            return Err(AuthError::Config {
                message: format!(
                    "replay store retention ttl ({}s) must be at least twice the nonce ttl ({}s)",
                    retention.as_secs(),
                    nonce_ttl.as_secs()
                ),
            });
        }

        Ok(Self {
            registry,
            replay,
            nonce_ttl,
            store_timeout,
        })
    }

    /// Authenticate a request.
    ///
    /// A fixed linear pipeline; the first failing step is terminal and
    /// nothing is retried. A rejected request must be re-submitted by the
    /// caller with fresh, corrected material.
    pub async fn authenticate(&self, request: &SigningRequest) -> AuthResult<Authentication> {
        let credential = self
            .registry
            .credential(&request.service)
            .ok_or_else(|| {
                warn!(service = %request.service, "unknown service");
                AuthError::rejected(RejectionKind::UnknownService {
                    service: request.service.clone(),
                })
            })?;

        let nonce = self.validate_nonce(request, credential).await?;

        self.verify_signature(request, credential, nonce)?;

        debug!(service = %request.service, "request authenticated");
        Ok(Authentication {
            service: request.service.clone(),
            user: request.user.clone(),
            authenticated: true,
        })
    }

    /// Validate the request nonce and claim it in the replay store.
    ///
    /// Returns the nonce text that must be included in the canonical signing
    /// string, or `None` when a nonce-optional service sent no nonce.
    async fn validate_nonce<'a>(
        &self,
        request: &'a SigningRequest,
        credential: &ServiceCredential,
    ) -> AuthResult<Option<&'a str>> {
        let text = match request.nonce_text() {
            Some(text) => text,
            None => {
                return match credential.nonce_compliance {
                    NonceCompliance::Required => {
                        warn!(service = %request.service, "nonce missing");
                        Err(AuthError::rejected(RejectionKind::NonceMissing))
                    }
                    // Nonce-optional services skip replay checking entirely.
                    NonceCompliance::Optional => Ok(None),
                };
            }
        };

        let nonce = Nonce::parse(text, self.nonce_ttl)?;
        if nonce.is_expired() {
            warn!(service = %request.service, "nonce expired");
            return Err(AuthError::rejected(RejectionKind::NonceExpired));
        }

        // Store access is bounded and fails closed: an unreachable store
        // rejects the request rather than bypassing replay protection.
        let fresh = tokio::time::timeout(self.store_timeout, self.replay.reserve(text))
            .await
            .map_err(|_| AuthError::StoreUnavailable {
                message: format!(
                    "replay store did not answer within {}ms",
                    self.store_timeout.as_millis()
                ),
            })??;

        if !fresh {
            warn!(service = %request.service, "nonce already used");
            return Err(AuthError::rejected(RejectionKind::NonceReused));
        }

        Ok(Some(text))
    }

    /// Verify the declared signature against the one recomputed from the
    /// request, using the strategy selected by the auth version tag.
    fn verify_signature(
        &self,
        request: &SigningRequest,
        credential: &ServiceCredential,
        nonce: Option<&str>,
    ) -> AuthResult<()> {
        let algorithm = Algorithm::from_wire(request.algorithm.as_deref())?;

        let verified = match AuthVersion::from_wire(request.version.as_deref()) {
            // The legacy tags are accepted on the wire but verified with the
            // current canonical form; their distinct transports are gone.
            AuthVersion::V2 | AuthVersion::V3 | AuthVersion::V4 => signature::verify(
                &request.method,
                &request.path,
                nonce,
                &credential.secret,
                algorithm,
                &request.signature,
            ),
        };

        if !verified {
            warn!(service = %request.service, "signature mismatch");
            return Err(AuthError::rejected(RejectionKind::SignatureMismatch));
        }

        Ok(())
    }
}
