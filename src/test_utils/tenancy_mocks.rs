//! In-memory mock of the tenancy store.
//!
//! One `InMemoryTenancyStore` implements `UserRepo`, `ProjectRepo` and `ScanResultRepo`
//! over the same maps, so use cases wired from it see each other's writes the way
//! they would against Postgres.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    application::use_cases::{
        project::{KeyAppend, KeyMatch, ProjectOwnership, ProjectRepo},
        scan::ScanResultRepo,
        user::UserRepo,
    },
    domain::entities::{
        api_key::{ApiKey, count_active},
        project::Project,
        scan_result::{NewScanResult, ScanResult},
        user::User,
    },
};

#[derive(Default)]
pub struct InMemoryTenancyStore {
    /// Keyed by e-mail.
    pub users: Mutex<HashMap<String, User>>,
    /// Insertion order.
    pub scan_results: Mutex<Vec<ScanResult>>,
}

impl InMemoryTenancyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with initial users for testing.
    pub fn with_users(users: Vec<User>) -> Self {
        let map = users.into_iter().map(|u| (u.email.clone(), u)).collect();
        Self {
            users: Mutex::new(map),
            scan_results: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of one user (for test assertions).
    pub fn get_user(&self, email: &str) -> Option<User> {
        self.users.lock().unwrap().get(email).cloned()
    }

    pub fn scan_result_count(&self) -> usize {
        self.scan_results.lock().unwrap().len()
    }
}

#[async_trait]
impl UserRepo for InMemoryTenancyStore {
    async fn create_user(
        &self,
        username: &str,
        email: &str,
        hashed_password: &str,
    ) -> AppResult<User> {
        let mut users = self.users.lock().unwrap();
        if users.contains_key(email) {
            return Err(AppError::InvalidInput("Email already registered".into()));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: email.to_string(),
            hashed_password: hashed_password.to_string(),
            projects: vec![],
            created_at: now,
            updated_at: now,
        };
        users.insert(user.email.clone(), user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self.users.lock().unwrap().get(email).cloned())
    }
}

#[async_trait]
impl ProjectRepo for InMemoryTenancyStore {
    async fn create_project(&self, owner_email: &str, project: &Project) -> AppResult<bool> {
        let mut users = self.users.lock().unwrap();
        let Some(user) = users.get_mut(owner_email) else {
            return Ok(false);
        };
        user.projects.push(project.clone());
        user.updated_at = Utc::now();
        Ok(true)
    }

    async fn list_projects(&self, owner_email: &str) -> AppResult<Vec<Project>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .get(owner_email)
            .map(|u| u.projects.clone())
            .unwrap_or_default())
    }

    async fn find_project_by_id(&self, project_id: Uuid) -> AppResult<Option<ProjectOwnership>> {
        let users = self.users.lock().unwrap();
        Ok(users.values().find_map(|u| {
            u.project(project_id).map(|p| ProjectOwnership {
                owner_email: u.email.clone(),
                project: p.clone(),
            })
        }))
    }

    async fn find_project_by_key(&self, raw_key: &str) -> AppResult<Option<KeyMatch>> {
        let users = self.users.lock().unwrap();
        for user in users.values() {
            for project in &user.projects {
                if let Some(key) = project.find_active_key(raw_key) {
                    return Ok(Some(KeyMatch {
                        owner_email: user.email.clone(),
                        project: project.clone(),
                        api_key: key.clone(),
                    }));
                }
            }
        }
        Ok(None)
    }

    async fn append_key_to_project(
        &self,
        owner_email: &str,
        project_id: Uuid,
        key: &ApiKey,
        max_active: usize,
    ) -> AppResult<KeyAppend> {
        let mut users = self.users.lock().unwrap();
        let Some(project) = users
            .get_mut(owner_email)
            .and_then(|u| u.projects.iter_mut().find(|p| p.project_id == project_id))
        else {
            return Ok(KeyAppend::ProjectMissing);
        };
        if count_active(&project.api_keys) >= max_active {
            return Ok(KeyAppend::AtCapacity);
        }
        project.api_keys.push(key.clone());
        Ok(KeyAppend::Appended)
    }

    async fn remove_key_from_project(
        &self,
        owner_email: &str,
        project_id: Uuid,
        raw_key: &str,
    ) -> AppResult<bool> {
        let mut users = self.users.lock().unwrap();
        let Some(project) = users
            .get_mut(owner_email)
            .and_then(|u| u.projects.iter_mut().find(|p| p.project_id == project_id))
        else {
            return Ok(false);
        };
        let before = project.api_keys.len();
        project.api_keys.retain(|k| k.key != raw_key);
        Ok(project.api_keys.len() != before)
    }
}

#[async_trait]
impl ScanResultRepo for InMemoryTenancyStore {
    async fn insert_scan_result(&self, result: &NewScanResult) -> AppResult<ScanResult> {
        let stored = ScanResult {
            id: Uuid::new_v4(),
            status: result.status.clone(),
            message: result.message.clone(),
            human_readable: result.human_readable.clone(),
            risk_analysis: result.risk_analysis.clone(),
            solutions: result.solutions.clone(),
            scan_data: result.scan_data.clone(),
            project_id: result.project_id,
            project_name: result.project_name.clone(),
            created_at: Utc::now(),
        };
        self.scan_results.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn list_scan_results_by_project(&self, project_id: Uuid) -> AppResult<Vec<ScanResult>> {
        Ok(self
            .scan_results
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|r| r.project_id == Some(project_id))
            .cloned()
            .collect())
    }

    async fn get_scan_result(&self, id: Uuid) -> AppResult<Option<ScanResult>> {
        Ok(self
            .scan_results
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_api_key, create_test_project, create_test_user};

    #[tokio::test]
    async fn find_project_by_key_skips_inactive_keys() {
        let mut inactive = create_test_api_key("sk_off", 30);
        inactive.is_active = false;
        let project = create_test_project("p1", |p| {
            p.api_keys = vec![inactive, create_test_api_key("sk_on", 30)]
        });
        let project_id = project.project_id;
        let store = InMemoryTenancyStore::with_users(vec![create_test_user("a@x.com", |u| {
            u.projects = vec![project]
        })]);

        assert!(store.find_project_by_key("sk_off").await.unwrap().is_none());
        let found = store.find_project_by_key("sk_on").await.unwrap().unwrap();
        assert_eq!(found.owner_email, "a@x.com");
        assert_eq!(found.project.project_id, project_id);
    }

    #[tokio::test]
    async fn inactive_keys_do_not_count_toward_capacity() {
        let mut inactive = create_test_api_key("sk_off", 30);
        inactive.is_active = false;
        let project = create_test_project("p1", |p| {
            p.api_keys = vec![
                inactive,
                create_test_api_key("sk_1", 30),
                create_test_api_key("sk_2", 30),
            ]
        });
        let project_id = project.project_id;
        let store = InMemoryTenancyStore::with_users(vec![create_test_user("a@x.com", |u| {
            u.projects = vec![project]
        })]);

        let outcome = store
            .append_key_to_project("a@x.com", project_id, &create_test_api_key("sk_3", 30), 3)
            .await
            .unwrap();
        assert_eq!(outcome, KeyAppend::Appended);

        let outcome = store
            .append_key_to_project("a@x.com", project_id, &create_test_api_key("sk_4", 30), 3)
            .await
            .unwrap();
        assert_eq!(outcome, KeyAppend::AtCapacity);
        assert_eq!(store.get_user("a@x.com").unwrap().projects[0].api_keys.len(), 4);
    }

    #[tokio::test]
    async fn scan_results_list_newest_first() {
        let store = InMemoryTenancyStore::new();
        let project_id = Uuid::new_v4();
        let new = |label: &str, project_id: Option<Uuid>| NewScanResult {
            status: "success".into(),
            message: label.into(),
            human_readable: String::new(),
            risk_analysis: String::new(),
            solutions: String::new(),
            scan_data: serde_json::json!({}),
            project_id,
            project_name: None,
        };

        store.insert_scan_result(&new("first", Some(project_id))).await.unwrap();
        store.insert_scan_result(&new("other", None)).await.unwrap();
        store.insert_scan_result(&new("second", Some(project_id))).await.unwrap();

        let listed = store.list_scan_results_by_project(project_id).await.unwrap();
        let messages: Vec<_> = listed.iter().map(|r| r.message.as_str()).collect();
        assert_eq!(messages, vec!["second", "first"]);
    }
}
