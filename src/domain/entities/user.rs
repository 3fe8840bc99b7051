use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::project::Project;

#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub hashed_password: String,
    pub projects: Vec<Project>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn project(&self, project_id: Uuid) -> Option<&Project> {
        self.projects.iter().find(|p| p.project_id == project_id)
    }
}
