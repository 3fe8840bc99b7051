//! Resolves a presented credential into a [`Principal`].

use std::sync::Arc;

use chrono::Utc;
use secrecy::SecretString;
use uuid::Uuid;

use crate::app_error::{AppError, AppResult};
use crate::application::jwt;
use crate::application::use_cases::api_key::key_fingerprint;
use crate::application::use_cases::project::ProjectRepo;
use crate::application::use_cases::user::UserRepo;
use crate::domain::entities::principal::{Credential, Principal, ProjectScope};

#[derive(Clone)]
pub struct CredentialVerifier {
    users: Arc<dyn UserRepo>,
    projects: Arc<dyn ProjectRepo>,
    jwt_secret: SecretString,
}

impl CredentialVerifier {
    pub fn new(
        users: Arc<dyn UserRepo>,
        projects: Arc<dyn ProjectRepo>,
        jwt_secret: SecretString,
    ) -> Self {
        Self {
            users,
            projects,
            jwt_secret,
        }
    }

    /// Bearer tokens yield a full-account principal, API keys a project-scoped one.
    pub async fn resolve(&self, credential: &Credential) -> AppResult<Principal> {
        match credential {
            Credential::None => Err(AppError::Unauthenticated),
            Credential::Bearer(token) => {
                let claims = jwt::verify(token, &self.jwt_secret)?;
                // the token may outlive its account
                if self.users.find_user_by_email(&claims.sub).await?.is_none() {
                    tracing::debug!("Bearer subject no longer exists");
                    return Err(AppError::InvalidCredential);
                }
                Ok(Principal::account(claims.sub))
            }
            Credential::ApiKey(raw_key) => {
                let fingerprint = key_fingerprint(raw_key);
                let Some(found) = self.projects.find_project_by_key(raw_key).await? else {
                    tracing::debug!(key_fingerprint = %fingerprint, "Unknown or inactive API key");
                    return Err(AppError::InvalidCredential);
                };
                if found.api_key.is_expired(Utc::now()) {
                    tracing::debug!(key_fingerprint = %fingerprint, "Expired API key");
                    return Err(AppError::CredentialExpired);
                }
                Ok(Principal::scoped(
                    found.owner_email,
                    ProjectScope {
                        project_id: found.project.project_id,
                        project_name: found.project.project_name,
                    },
                ))
            }
        }
    }

    /// Resolve and require access to `project_id`.
    ///
    /// Scoped principals must be bound to that project. Account principals must own it;
    /// a project owned by someone else is reported as absent.
    pub async fn resolve_for_project(
        &self,
        credential: &Credential,
        project_id: Uuid,
    ) -> AppResult<Principal> {
        let principal = self.resolve(credential).await?;
        match &principal.scope {
            Some(scope) if scope.project_id == project_id => Ok(principal),
            Some(_) => Err(AppError::ScopeMismatch),
            None => match self.projects.find_project_by_id(project_id).await? {
                Some(found) if found.owner_email == principal.identity => Ok(principal),
                _ => Err(AppError::NotFound),
            },
        }
    }

    /// Resolve and require a full-account principal.
    pub async fn resolve_account(&self, credential: &Credential) -> AppResult<Principal> {
        let principal = self.resolve(credential).await?;
        if !principal.is_full_account() {
            return Err(AppError::ScopeMismatch);
        }
        Ok(principal)
    }
}
