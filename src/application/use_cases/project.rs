use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::instrument;
use uuid::Uuid;

use crate::app_error::{AppError, AppResult};
use crate::application::validators;
use crate::domain::entities::{api_key::ApiKey, project::Project};

// ============================================================================
// Repository Trait
// ============================================================================

/// Mutations and lookups over the projects (and their keys) embedded in user documents.
///
/// Every method is a single atomic operation on one user document.
#[async_trait]
pub trait ProjectRepo: Send + Sync {
    /// Append a project to the owner's list. Returns `false` when the owner does not exist.
    async fn create_project(&self, owner_email: &str, project: &Project) -> AppResult<bool>;

    async fn list_projects(&self, owner_email: &str) -> AppResult<Vec<Project>>;

    /// Project ids are globally unique, so this resolves across tenants.
    async fn find_project_by_id(&self, project_id: Uuid) -> AppResult<Option<ProjectOwnership>>;

    /// Locate the (owner, project, key) triple for an active key. Expiry is not filtered here.
    async fn find_project_by_key(&self, raw_key: &str) -> AppResult<Option<KeyMatch>>;

    /// Append `key` only while the project has fewer than `max_active` active keys.
    /// The count and the append happen in one conditional update.
    async fn append_key_to_project(
        &self,
        owner_email: &str,
        project_id: Uuid,
        key: &ApiKey,
        max_active: usize,
    ) -> AppResult<KeyAppend>;

    /// Remove the entry whose `key` equals `raw_key`. Returns whether a removal occurred.
    async fn remove_key_from_project(
        &self,
        owner_email: &str,
        project_id: Uuid,
        raw_key: &str,
    ) -> AppResult<bool>;
}

// ============================================================================
// Profile Types
// ============================================================================

#[derive(Debug, Clone)]
pub struct ProjectOwnership {
    pub owner_email: String,
    pub project: Project,
}

#[derive(Debug, Clone)]
pub struct KeyMatch {
    pub owner_email: String,
    pub project: Project,
    pub api_key: ApiKey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAppend {
    Appended,
    AtCapacity,
    ProjectMissing,
}

// ============================================================================
// Use Cases
// ============================================================================

#[derive(Clone)]
pub struct ProjectUseCases {
    repo: Arc<dyn ProjectRepo>,
}

impl ProjectUseCases {
    pub fn new(repo: Arc<dyn ProjectRepo>) -> Self {
        Self { repo }
    }

    #[instrument(skip(self))]
    pub async fn create_project(
        &self,
        owner_email: &str,
        name: &str,
        description: Option<&str>,
    ) -> AppResult<Project> {
        if !validators::is_valid_project_name(name) {
            return Err(AppError::InvalidInput(
                "Project name must be 1-100 characters".into(),
            ));
        }
        let description = description
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string);

        let project = Project::new(name.trim().to_string(), description, Utc::now());
        if !self.repo.create_project(owner_email, &project).await? {
            return Err(AppError::NotFound);
        }

        tracing::info!(project_id = %project.project_id, "Project created");
        Ok(project)
    }

    pub async fn list_projects(&self, owner_email: &str) -> AppResult<Vec<Project>> {
        self.repo.list_projects(owner_email).await
    }

    /// Fetch a project owned by `owner_email`. Projects of other users are reported as absent.
    pub async fn get_project(&self, owner_email: &str, project_id: Uuid) -> AppResult<Project> {
        match self.repo.find_project_by_id(project_id).await? {
            Some(found) if found.owner_email == owner_email => Ok(found.project),
            _ => Err(AppError::NotFound),
        }
    }
}
