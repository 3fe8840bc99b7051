use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use rand::RngCore;
use sha2::{Digest, Sha256};
use tracing::instrument;
use uuid::Uuid;

use crate::app_error::{AppError, AppResult};
use crate::application::use_cases::project::{KeyAppend, ProjectRepo};
use crate::domain::entities::api_key::{ApiKey, MAX_ACTIVE_KEYS_PER_PROJECT};

pub const DEFAULT_VALIDITY_DAYS: i64 = 30;

/// Bounds accepted for `validity_days`. Negative values are allowed and produce already-expired keys.
pub const MAX_VALIDITY_DAYS: i64 = 3650;

// ============================================================================
// Use Cases
// ============================================================================

/// Create, list and revoke project-scoped API keys.
#[derive(Clone)]
pub struct ApiKeyUseCases {
    repo: Arc<dyn ProjectRepo>,
}

impl ApiKeyUseCases {
    pub fn new(repo: Arc<dyn ProjectRepo>) -> Self {
        Self { repo }
    }

    /// Issue a new key for a project owned by `owner_email`.
    ///
    /// The active-key count is checked and the key appended in one store operation,
    /// so concurrent creations cannot push a project past the limit.
    #[instrument(skip(self))]
    pub async fn create_key(
        &self,
        owner_email: &str,
        project_id: Uuid,
        validity_days: i64,
    ) -> AppResult<ApiKey> {
        if !(-MAX_VALIDITY_DAYS..=MAX_VALIDITY_DAYS).contains(&validity_days) {
            return Err(AppError::InvalidInput(format!(
                "validity_days must be between -{MAX_VALIDITY_DAYS} and {MAX_VALIDITY_DAYS}"
            )));
        }

        let key = ApiKey::issue(generate_api_key(), Utc::now(), validity_days);
        match self
            .repo
            .append_key_to_project(owner_email, project_id, &key, MAX_ACTIVE_KEYS_PER_PROJECT)
            .await?
        {
            KeyAppend::Appended => {
                tracing::info!(
                    %project_id,
                    key_fingerprint = %key_fingerprint(&key.key),
                    expires_at = %key.expires_at,
                    "API key created"
                );
                Ok(key)
            }
            KeyAppend::AtCapacity => {
                tracing::info!(%project_id, "API key limit reached");
                Err(AppError::CapacityExceeded)
            }
            KeyAppend::ProjectMissing => Err(AppError::NotFound),
        }
    }

    /// All keys of the project, including inactive and expired ones.
    pub async fn list_keys(&self, owner_email: &str, project_id: Uuid) -> AppResult<Vec<ApiKey>> {
        match self.repo.find_project_by_id(project_id).await? {
            Some(found) if found.owner_email == owner_email => Ok(found.project.api_keys),
            _ => Err(AppError::NotFound),
        }
    }

    /// Delete a key. Returns `false` when no matching key existed, so repeated calls are harmless.
    #[instrument(skip(self, raw_key))]
    pub async fn revoke_key(
        &self,
        owner_email: &str,
        project_id: Uuid,
        raw_key: &str,
    ) -> AppResult<bool> {
        let removed = self
            .repo
            .remove_key_from_project(owner_email, project_id, raw_key)
            .await?;
        tracing::info!(
            %project_id,
            key_fingerprint = %key_fingerprint(raw_key),
            removed,
            "API key revoke requested"
        );
        Ok(removed)
    }
}

// ============================================================================
// Key Generation
// ============================================================================

/// Generate a new API key with format: sk_<base64url_32_bytes>
pub fn generate_api_key() -> String {
    let mut bytes = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    format!("sk_{}", URL_SAFE_NO_PAD.encode(bytes))
}

/// Short SHA-256 prefix used to refer to a key in logs without revealing it.
pub fn key_fingerprint(raw_key: &str) -> String {
    let hash = hex::encode(Sha256::digest(raw_key.as_bytes()));
    hash[..12].to_string()
}
