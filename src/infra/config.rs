use std::net::SocketAddr;

use axum::http::HeaderValue;
use env_helpers::get_env_default;
use secrecy::SecretString;
use time::Duration;
use url::Url;

use super::InfraError;

/// Settings for the OpenAI-compatible text-generation endpoint.
pub struct LlmConfig {
    pub api_key: SecretString,
    pub base_url: Url,
    pub model: String,
    /// Applied to each generation stage separately.
    pub timeout: std::time::Duration,
    pub max_tokens: u32,
}

pub struct AppConfig {
    pub jwt_secret: SecretString,
    pub access_token_ttl: Duration,
    pub cors_origin: HeaderValue,
    pub bind_addr: SocketAddr,
    pub redis_url: String,
    pub rate_limit_window_secs: u64,
    pub rate_limit_per_ip: u64,
    pub database_url: String,
    /// Whether to trust X-Forwarded-For headers. Set to true when behind a reverse proxy.
    /// SECURITY: Only enable this when the API is not directly exposed to the internet.
    pub trust_proxy: bool,
    pub bcrypt_cost: u32,
    pub llm: LlmConfig,
    pub max_scan_body_bytes: usize,
    pub shutdown_grace: std::time::Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, InfraError> {
        let jwt_secret = SecretString::new(required("JWT_SECRET")?.into());
        let access_token_ttl_minutes: i64 = get_env_default("ACCESS_TOKEN_TTL_MINUTES", 30);

        let cors_origin: HeaderValue =
            get_env_default("CORS_ORIGIN", String::from("http://localhost:3000"))
                .parse()
                .map_err(|_| InfraError::ConfigInvalid { var: "CORS_ORIGIN" })?;

        let bind_addr: SocketAddr = get_env_default("BIND_ADDR", String::from("127.0.0.1:8000"))
            .parse()
            .map_err(|_| InfraError::ConfigInvalid { var: "BIND_ADDR" })?;
        let redis_url: String = get_env_default("REDIS_URL", "redis://127.0.0.1:6379".to_string());
        let rate_limit_window_secs: u64 = get_env_default("RATE_LIMIT_WINDOW_SECS", 60);
        let rate_limit_per_ip: u64 = get_env_default("RATE_LIMIT_PER_IP", 120);
        let database_url = required("DATABASE_URL")?;
        // Default to false for security - must explicitly enable when behind a trusted proxy
        let trust_proxy: bool = get_env_default("TRUST_PROXY", false);
        let bcrypt_cost: u32 = get_env_default("BCRYPT_COST", super::password::DEFAULT_COST);

        let llm = LlmConfig {
            api_key: SecretString::new(required("LLM_API_KEY")?.into()),
            base_url: get_env_default(
                "LLM_BASE_URL",
                String::from("https://api.cerebras.ai/v1"),
            )
            .parse()
            .map_err(|_| InfraError::ConfigInvalid { var: "LLM_BASE_URL" })?,
            model: get_env_default("LLM_MODEL", "llama3.1-8b".to_string()),
            timeout: std::time::Duration::from_secs(get_env_default("LLM_TIMEOUT_SECS", 60)),
            max_tokens: get_env_default("LLM_MAX_TOKENS", 8192),
        };

        let max_scan_body_bytes: usize = get_env_default("MAX_SCAN_BODY_BYTES", 5 * 1024 * 1024);
        let shutdown_grace_secs: u64 = get_env_default("SHUTDOWN_GRACE_SECS", 5);

        Ok(Self {
            jwt_secret,
            access_token_ttl: Duration::minutes(access_token_ttl_minutes),
            cors_origin,
            bind_addr,
            redis_url,
            rate_limit_window_secs,
            rate_limit_per_ip,
            database_url,
            trust_proxy,
            bcrypt_cost,
            llm,
            max_scan_body_bytes,
            shutdown_grace: std::time::Duration::from_secs(shutdown_grace_secs),
        })
    }
}

fn required(var: &'static str) -> Result<String, InfraError> {
    match std::env::var(var) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(InfraError::ConfigMissing { var }),
    }
}
