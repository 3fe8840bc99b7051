//! Test data factories for creating valid test fixtures.
//!
//! Each factory function creates a complete, valid object with sensible defaults.
//! Use the closure parameter to override specific fields as needed.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::domain::entities::{api_key::ApiKey, project::Project, user::User};

/// Create a test user with no projects. The stored hash is not a valid bcrypt hash.
pub fn create_test_user(email: &str, overrides: impl FnOnce(&mut User)) -> User {
    let now = test_datetime();
    let mut user = User {
        id: Uuid::new_v4(),
        username: email.split('@').next().unwrap_or("user").to_string(),
        email: email.to_string(),
        hashed_password: "not-a-real-hash".to_string(),
        projects: vec![],
        created_at: now,
        updated_at: now,
    };
    overrides(&mut user);
    user
}

/// Create a test project with no keys.
pub fn create_test_project(name: &str, overrides: impl FnOnce(&mut Project)) -> Project {
    let mut project = Project::new(name.to_string(), None, test_datetime());
    overrides(&mut project);
    project
}

/// Create an active key valid for `validity_days` from now.
pub fn create_test_api_key(raw_key: &str, validity_days: i64) -> ApiKey {
    ApiKey::issue(raw_key.to_string(), Utc::now(), validity_days)
}

pub fn test_datetime() -> DateTime<Utc> {
    Utc::now()
}

pub fn test_datetime_offset_days(days: i64) -> DateTime<Utc> {
    Utc::now() + Duration::days(days)
}
