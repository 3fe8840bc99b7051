use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use crate::{
    adapters::persistence::{PostgresPersistence, parse_json_with_fallback},
    app_error::{AppError, AppResult},
    domain::entities::user::User,
    use_cases::user::UserRepo,
};

pub(super) fn row_to_user(row: sqlx::postgres::PgRow) -> User {
    let id: Uuid = row.get("id");
    let projects: serde_json::Value = row.get("projects");
    User {
        id,
        username: row.get("username"),
        email: row.get("email"),
        hashed_password: row.get("hashed_password"),
        projects: parse_json_with_fallback(&projects, "projects", "user", &id.to_string()),
        created_at: row.get::<DateTime<Utc>, _>("created_at"),
        updated_at: row.get::<DateTime<Utc>, _>("updated_at"),
    }
}

#[async_trait]
impl UserRepo for PostgresPersistence {
    async fn create_user(
        &self,
        username: &str,
        email: &str,
        hashed_password: &str,
    ) -> AppResult<User> {
        let row = sqlx::query(
            r#"
            INSERT INTO users (id, username, email, hashed_password)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, email, hashed_password, projects, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(username)
        .bind(email)
        .bind(hashed_password)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match AppError::from(e) {
            AppError::InvalidInput(_) => AppError::InvalidInput("Email already registered".into()),
            other => other,
        })?;

        Ok(row_to_user(row))
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, username, email, hashed_password, projects, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(row.map(row_to_user))
    }
}
