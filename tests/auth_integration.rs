//! Integration tests for the authentication pipeline.
//!
//! These tests load configuration from an on-disk TOML file, wire the
//! registry, replay store and authenticator together the way a consuming
//! service would, and drive full requests through the pipeline — including
//! requests whose headers were produced by the outbound generator.

use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

use peerauth::auth::{
    Authenticator, CacheReplayStore, CredentialRegistry, HeaderGenerator, Nonce,
};
use peerauth::config::Settings;
use peerauth::error::{AuthError, RejectionKind};
use peerauth::protocol::{
    SigningRequest, HEADER_ALGO, HEADER_NONCE, HEADER_SERVICE, HEADER_SIGNATURE, HEADER_VERSION,
};

const CONFIG: &str = r#"
[security]
nonce_ttl_seconds = 10
default_client_name = "billing"
store_timeout_seconds = 2

[security.keys.orders]
secret = "samplesecret00"

[security.keys.legacy-reports]
secret = "reportsecret0"
nonce_compliance = "optional"

[replay]
retention_ttl_seconds = 60
max_entries = 1000
"#;

/// A fully wired authentication stack, built from an on-disk config file.
struct TestStack {
    settings: Settings,
    registry: Arc<CredentialRegistry>,
    authenticator: Authenticator,
    _temp_dir: TempDir,
}

impl TestStack {
    fn build() -> Self {
        Self::build_with_config(CONFIG)
    }

    fn build_with_config(config: &str) -> Self {
        init_tracing();

        let temp_dir = TempDir::new().expect("failed to create temp directory");
        let config_path = temp_dir.path().join("peerauth.toml");
        std::fs::write(&config_path, config).expect("failed to write config");

        let settings = Settings::load(&config_path).expect("failed to load settings");
        let registry = Arc::new(
            CredentialRegistry::new(
                settings.security.keys.clone(),
                settings.security.default_client_name.clone(),
            )
            .expect("failed to build registry"),
        );
        let store = Arc::new(CacheReplayStore::new(
            settings.retention_ttl(),
            settings.replay.max_entries,
        ));
        let authenticator = Authenticator::new(
            Arc::clone(&registry),
            store,
            settings.nonce_ttl(),
            settings.store_timeout(),
        )
        .expect("failed to build authenticator");

        Self {
            settings,
            registry,
            authenticator,
            _temp_dir: temp_dir,
        }
    }

    /// Sign a request for `service` the way a well-behaved peer would.
    fn signed_request(&self, service: &str, method: &str, path: &str) -> SigningRequest {
        let secret = &self.registry.credential(service).unwrap().secret;
        let nonce = Nonce::create_with_ttl(self.settings.nonce_ttl())
            .unwrap()
            .to_string();
        let signature = peerauth::auth::sign(
            method,
            path,
            Some(&nonce),
            secret,
            peerauth::auth::Algorithm::HmacSha1,
        );
        SigningRequest::new(method, path, service, signature).with_nonce(nonce)
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_test_writer()
        .try_init();
}

fn header<'a>(headers: &'a [(&'static str, String)], name: &str) -> &'a str {
    headers
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.as_str())
        .unwrap()
}

#[tokio::test]
async fn authenticates_a_correctly_signed_request() {
    let stack = TestStack::build();

    let request = stack.signed_request("orders", "GET", "/api/v1/test/url");
    let result = stack.authenticator.authenticate(&request).await.unwrap();

    assert_eq!(result.service, "orders");
    assert!(result.authenticated);
}

#[tokio::test]
async fn rejects_a_replayed_request() {
    let stack = TestStack::build();

    let request = stack.signed_request("orders", "GET", "/api/v1/test/url");
    assert!(stack.authenticator.authenticate(&request).await.is_ok());

    let err = stack.authenticator.authenticate(&request).await.unwrap_err();
    assert_eq!(err.rejection(), Some(&RejectionKind::NonceReused));
}

#[tokio::test]
async fn rejects_a_tampered_path() {
    let stack = TestStack::build();

    let mut request = stack.signed_request("orders", "GET", "/api/v1/test/url");
    request.path = "/api/v1/admin".to_string();

    let err = stack.authenticator.authenticate(&request).await.unwrap_err();
    assert_eq!(err.rejection(), Some(&RejectionKind::SignatureMismatch));
}

#[tokio::test]
async fn nonce_optional_service_authenticates_without_a_nonce() {
    let stack = TestStack::build();

    let signature = peerauth::auth::sign(
        "GET",
        "/api/v1/reports",
        None,
        "reportsecret0",
        peerauth::auth::Algorithm::HmacSha1,
    );
    let request = SigningRequest::new("GET", "/api/v1/reports", "legacy-reports", signature);

    let result = stack.authenticator.authenticate(&request).await.unwrap();
    assert!(result.authenticated);
}

#[tokio::test]
async fn nonce_required_service_must_send_a_nonce() {
    let stack = TestStack::build();

    let signature = peerauth::auth::sign(
        "GET",
        "/api/v1/orders",
        None,
        "samplesecret00",
        peerauth::auth::Algorithm::HmacSha1,
    );
    let request = SigningRequest::new("GET", "/api/v1/orders", "orders", signature);

    let err = stack.authenticator.authenticate(&request).await.unwrap_err();
    assert_eq!(err.rejection(), Some(&RejectionKind::NonceMissing));
}

#[tokio::test]
async fn outbound_headers_verify_against_the_inbound_pipeline() {
    let stack = TestStack::build();

    // "orders" here plays both caller and callee: the generator signs with
    // the same credential the authenticator verifies against.
    let generator = HeaderGenerator::new("orders", Arc::clone(&stack.registry)).unwrap();
    let headers = generator.generate("POST", "/api/v1/invoices").unwrap();

    assert_eq!(header(&headers, HEADER_SERVICE), "billing");
    assert_eq!(header(&headers, HEADER_VERSION), "V4");

    let request = SigningRequest::new(
        "POST",
        "/api/v1/invoices",
        "orders",
        header(&headers, HEADER_SIGNATURE),
    )
    .with_nonce(header(&headers, HEADER_NONCE))
    .with_algorithm(header(&headers, HEADER_ALGO));

    let result = stack.authenticator.authenticate(&request).await.unwrap();
    assert!(result.authenticated);
}

#[tokio::test]
async fn user_identifier_is_passed_through() {
    let stack = TestStack::build();

    let request = stack
        .signed_request("orders", "GET", "/api/v1/test/url")
        .with_user("user-42");
    let result = stack.authenticator.authenticate(&request).await.unwrap();
    assert_eq!(result.user.as_deref(), Some("user-42"));
}

#[tokio::test]
async fn short_retention_is_rejected_at_startup() {
    init_tracing();

    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("peerauth.toml");
    std::fs::write(
        &config_path,
        r#"
        [security]
        nonce_ttl_seconds = 10

        [security.keys.orders]
        secret = "samplesecret00"

        [replay]
        retention_ttl_seconds = 15
        "#,
    )
    .unwrap();

    // Config validation itself enforces the 2x margin.
    let err = Settings::load(&config_path).unwrap_err();
    assert!(matches!(err, AuthError::Config { .. }));

    // And a store whose actual retention is too short is refused even when
    // the config numbers looked fine.
    let stack = TestStack::build();
    let short_store = Arc::new(CacheReplayStore::new(Duration::from_secs(15), 1000));
    let err = Authenticator::new(
        Arc::clone(&stack.registry),
        short_store,
        Duration::from_secs(10),
        Duration::from_secs(2),
    )
    .err()
    .unwrap();
    assert!(matches!(err, AuthError::Config { .. }));
}

#[tokio::test]
async fn empty_secret_is_rejected_when_building_the_registry() {
    init_tracing();

    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("peerauth.toml");
    std::fs::write(
        &config_path,
        r#"
        [security.keys.orders]
        secret = ""
        "#,
    )
    .unwrap();

    let settings = Settings::load(&config_path).unwrap();
    let err = CredentialRegistry::new(
        settings.security.keys.clone(),
        settings.security.default_client_name.clone(),
    )
    .unwrap_err();
    assert!(matches!(err, AuthError::Config { .. }));
}

#[tokio::test]
async fn distinct_services_share_the_replay_ledger() {
    // Replay entries key on the bare nonce text: a nonce accepted for one
    // service blocks the same text for every other service.
    let stack = TestStack::build();

    let orders = stack.signed_request("orders", "GET", "/api/v1/test/url");
    let nonce = orders.nonce.clone().unwrap();
    assert!(stack.authenticator.authenticate(&orders).await.is_ok());

    let signature = peerauth::auth::sign(
        "GET",
        "/api/v1/reports",
        Some(&nonce),
        "reportsecret0",
        peerauth::auth::Algorithm::HmacSha1,
    );
    let reports = SigningRequest::new("GET", "/api/v1/reports", "legacy-reports", signature)
        .with_nonce(nonce);

    let err = stack.authenticator.authenticate(&reports).await.unwrap_err();
    assert_eq!(err.rejection(), Some(&RejectionKind::NonceReused));
}
