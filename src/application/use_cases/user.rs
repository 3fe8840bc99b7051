use std::sync::Arc;

use async_trait::async_trait;
use secrecy::SecretString;
use time::Duration;
use tracing::instrument;

use crate::app_error::{AppError, AppResult};
use crate::application::{jwt, validators};
use crate::domain::entities::user::User;
use crate::infra::password::{hash_password_blocking, verify_password_blocking};

#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn create_user(
        &self,
        username: &str,
        email: &str,
        hashed_password: &str,
    ) -> AppResult<User>;
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>>;
}

/// Issued on successful login.
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: String,
    pub expires_in_secs: i64,
}

#[derive(Clone)]
pub struct AuthUseCases {
    repo: Arc<dyn UserRepo>,
    jwt_secret: SecretString,
    access_token_ttl: Duration,
    bcrypt_cost: u32,
}

impl AuthUseCases {
    pub fn new(
        repo: Arc<dyn UserRepo>,
        jwt_secret: SecretString,
        access_token_ttl: Duration,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            repo,
            jwt_secret,
            access_token_ttl,
            bcrypt_cost,
        }
    }

    #[instrument(skip(self, password))]
    pub async fn register(&self, username: &str, email: &str, password: &str) -> AppResult<User> {
        let username = username.trim();
        let email = normalize_email(email);

        if !validators::is_valid_username(username) {
            return Err(AppError::InvalidInput(
                "Username must be 3-50 characters".into(),
            ));
        }
        if !validators::is_valid_email(&email) {
            return Err(AppError::InvalidInput("Invalid email address".into()));
        }
        if !validators::is_valid_password(password) {
            return Err(AppError::InvalidInput(
                "Password must be 8-128 characters".into(),
            ));
        }

        if self.repo.find_user_by_email(&email).await?.is_some() {
            return Err(AppError::InvalidInput("Email already registered".into()));
        }

        let hashed = hash_password_blocking(password.to_string(), self.bcrypt_cost).await?;
        let user = self.repo.create_user(username, &email, &hashed).await?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> AppResult<AccessToken> {
        let email = normalize_email(email);
        let Some(user) = self.repo.find_user_by_email(&email).await? else {
            return Err(AppError::InvalidCredential);
        };

        let matches =
            verify_password_blocking(password.to_string(), user.hashed_password.clone())
                .await?;
        if !matches {
            return Err(AppError::InvalidCredential);
        }

        let token = jwt::issue(&user.email, &self.jwt_secret, self.access_token_ttl)?;
        Ok(AccessToken {
            token,
            expires_in_secs: self.access_token_ttl.whole_seconds(),
        })
    }

    pub async fn profile(&self, email: &str) -> AppResult<User> {
        self.repo
            .find_user_by_email(email)
            .await?
            .ok_or(AppError::NotFound)
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
