use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::api_key::ApiKey;

/// A project embedded in its owner's document. Field names follow the persisted layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub project_id: Uuid,
    pub project_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_description: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub api_keys: Vec<ApiKey>,
}

impl Project {
    pub fn new(name: String, description: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            project_id: Uuid::new_v4(),
            project_name: name,
            project_description: description,
            created_at: now,
            api_keys: Vec::new(),
        }
    }

    pub fn find_active_key(&self, raw_key: &str) -> Option<&ApiKey> {
        self.api_keys
            .iter()
            .find(|k| k.is_active && k.key == raw_key)
    }
}
