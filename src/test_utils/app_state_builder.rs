//! Test app state builder for HTTP-level testing.
//!
//! `TestAppStateBuilder` creates an `AppState` backed by one in-memory tenancy
//! store and an in-process text generator, so routes can be exercised end to end.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::HeaderValue;
use secrecy::SecretString;
use time::Duration;
use tokio_util::sync::CancellationToken;

use crate::{
    adapters::http::app_state::AppState,
    application::{
        jwt,
        pipeline::ScanPipeline,
        ports::text_generator::TextGenerator,
        use_cases::{
            api_key::ApiKeyUseCases, credentials::CredentialVerifier, project::ProjectUseCases,
            scan::ScanUseCases, user::AuthUseCases,
        },
    },
    domain::entities::user::User,
    infra::{
        RateLimiterTrait,
        config::{AppConfig, LlmConfig},
    },
    test_utils::{CannedTextGenerator, InMemoryRateLimiter, InMemoryTenancyStore, TEST_BCRYPT_COST},
};

pub const TEST_JWT_SECRET: &str = "test_jwt_secret";

/// Minimal config for testing; nothing in it points at a live service.
pub fn test_config() -> AppConfig {
    AppConfig {
        jwt_secret: SecretString::new(TEST_JWT_SECRET.into()),
        access_token_ttl: Duration::minutes(30),
        cors_origin: HeaderValue::from_static("http://localhost:3000"),
        bind_addr: "127.0.0.1:8000".parse::<SocketAddr>().unwrap(),
        redis_url: String::new(),
        rate_limit_window_secs: 60,
        rate_limit_per_ip: 60,
        database_url: String::new(),
        trust_proxy: false,
        bcrypt_cost: TEST_BCRYPT_COST,
        llm: LlmConfig {
            api_key: SecretString::new("test_llm_key".into()),
            base_url: "http://localhost:9/v1".parse().unwrap(),
            model: "test-model".to_string(),
            timeout: std::time::Duration::from_secs(5),
            max_tokens: 256,
        },
        max_scan_body_bytes: 64 * 1024,
        shutdown_grace: std::time::Duration::from_secs(1),
    }
}

/// `Authorization` header value carrying a valid token for `email`.
pub fn bearer_header(email: &str) -> String {
    let token = jwt::issue(
        email,
        &SecretString::new(TEST_JWT_SECRET.into()),
        Duration::minutes(5),
    )
    .unwrap();
    format!("Bearer {token}")
}

/// Builder for creating `AppState` with in-memory mocks for testing.
///
/// # Example
///
/// ```ignore
/// let (app_state, store) = TestAppStateBuilder::new()
///     .with_user(create_test_user("a@x.com", |_| {}))
///     .build_with_store();
/// ```
pub struct TestAppStateBuilder {
    users: Vec<User>,
    generator: Option<Arc<dyn TextGenerator>>,
    rate_limiter: Option<Arc<dyn RateLimiterTrait>>,
    shutdown: CancellationToken,
    max_scan_body_bytes: Option<usize>,
}

impl TestAppStateBuilder {
    pub fn new() -> Self {
        Self {
            users: vec![],
            generator: None,
            rate_limiter: None,
            shutdown: CancellationToken::new(),
            max_scan_body_bytes: None,
        }
    }

    /// Seed a user (and any projects/keys it carries).
    pub fn with_user(mut self, user: User) -> Self {
        self.users.push(user);
        self
    }

    pub fn with_generator(mut self, generator: Arc<dyn TextGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn with_rate_limiter(mut self, rate_limiter: Arc<dyn RateLimiterTrait>) -> Self {
        self.rate_limiter = Some(rate_limiter);
        self
    }

    pub fn with_shutdown(mut self, shutdown: CancellationToken) -> Self {
        self.shutdown = shutdown;
        self
    }

    pub fn with_max_scan_body_bytes(mut self, limit: usize) -> Self {
        self.max_scan_body_bytes = Some(limit);
        self
    }

    pub fn build(self) -> AppState {
        self.build_with_store().0
    }

    /// Build the AppState and hand back the store for test assertions.
    pub fn build_with_store(self) -> (AppState, Arc<InMemoryTenancyStore>) {
        let mut config = test_config();
        if let Some(limit) = self.max_scan_body_bytes {
            config.max_scan_body_bytes = limit;
        }
        let config = Arc::new(config);
        let store = Arc::new(InMemoryTenancyStore::with_users(self.users));
        let generator = self
            .generator
            .unwrap_or_else(|| Arc::new(CannedTextGenerator::default()));
        let rate_limiter = self
            .rate_limiter
            .unwrap_or_else(|| Arc::new(InMemoryRateLimiter::permissive()));

        let credential_verifier = Arc::new(CredentialVerifier::new(
            store.clone(),
            store.clone(),
            config.jwt_secret.clone(),
        ));
        let auth_use_cases = Arc::new(AuthUseCases::new(
            store.clone(),
            config.jwt_secret.clone(),
            config.access_token_ttl,
            config.bcrypt_cost,
        ));
        let project_use_cases = Arc::new(ProjectUseCases::new(store.clone()));
        let api_key_use_cases = Arc::new(ApiKeyUseCases::new(store.clone()));
        let scan_use_cases = Arc::new(ScanUseCases::new(
            ScanPipeline::new(generator, config.llm.timeout),
            store.clone(),
            store.clone(),
            self.shutdown,
        ));

        let app_state = AppState {
            config,
            credential_verifier,
            auth_use_cases,
            project_use_cases,
            api_key_use_cases,
            scan_use_cases,
            rate_limiter,
        };
        (app_state, store)
    }
}

impl Default for TestAppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
