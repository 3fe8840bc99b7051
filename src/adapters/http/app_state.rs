use std::sync::Arc;

use crate::{
    application::use_cases::{
        api_key::ApiKeyUseCases, credentials::CredentialVerifier, project::ProjectUseCases,
        scan::ScanUseCases, user::AuthUseCases,
    },
    infra::{RateLimiterTrait, config::AppConfig},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub credential_verifier: Arc<CredentialVerifier>,
    pub auth_use_cases: Arc<AuthUseCases>,
    pub project_use_cases: Arc<ProjectUseCases>,
    pub api_key_use_cases: Arc<ApiKeyUseCases>,
    pub scan_use_cases: Arc<ScanUseCases>,
    pub rate_limiter: Arc<dyn RateLimiterTrait>,
}
