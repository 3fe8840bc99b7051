use crate::{
    adapters::{http::app_state::AppState, llm::OpenAiCompatibleGenerator},
    application::{
        pipeline::ScanPipeline,
        use_cases::{
            api_key::ApiKeyUseCases, credentials::CredentialVerifier, project::ProjectUseCases,
            scan::ScanUseCases, user::AuthUseCases,
        },
    },
    infra::{config::AppConfig, postgres_persistence, rate_limit::RedisRateLimiter},
};
use std::fs::File;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Wire every adapter into the use cases. `shutdown` is observed by running scan pipelines.
pub async fn init_app_state(shutdown: CancellationToken) -> anyhow::Result<AppState> {
    let config = AppConfig::from_env()?;

    let postgres_arc = Arc::new(postgres_persistence(&config.database_url).await?);

    let rate_limiter = Arc::new(
        RedisRateLimiter::new(
            &config.redis_url,
            config.rate_limit_window_secs,
            config.rate_limit_per_ip,
        )
        .await?,
    );

    let generator = Arc::new(OpenAiCompatibleGenerator::new(&config.llm)?);
    let pipeline = ScanPipeline::new(generator, config.llm.timeout);

    let credential_verifier = CredentialVerifier::new(
        postgres_arc.clone(),
        postgres_arc.clone(),
        config.jwt_secret.clone(),
    );
    let auth_use_cases = AuthUseCases::new(
        postgres_arc.clone(),
        config.jwt_secret.clone(),
        config.access_token_ttl,
        config.bcrypt_cost,
    );
    let project_use_cases = ProjectUseCases::new(postgres_arc.clone());
    let api_key_use_cases = ApiKeyUseCases::new(postgres_arc.clone());
    let scan_use_cases = ScanUseCases::new(
        pipeline,
        postgres_arc.clone(),
        postgres_arc,
        shutdown,
    );

    Ok(AppState {
        config: Arc::new(config),
        credential_verifier: Arc::new(credential_verifier),
        auth_use_cases: Arc::new(auth_use_cases),
        project_use_cases: Arc::new(project_use_cases),
        api_key_use_cases: Arc::new(api_key_use_cases),
        scan_use_cases: Arc::new(scan_use_cases),
        rate_limiter,
    })
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "secai=debug,tower_http=debug".into());

    // Console (pretty logs)
    let console_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .pretty();

    // File (structured JSON logs); skipped when app.log can't be created
    let json_layer = File::create("app.log").ok().map(|file| {
        fmt::layer()
            .json()
            .with_writer(file)
            .with_current_span(true)
            .with_span_list(true)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(json_layer)
        .try_init()
        .ok();
}
