use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A completed scan analysis. Created once and never mutated.
///
/// `project_id`/`project_name` are a denormalized snapshot of the submitting key's
/// project, so the record stays readable after the project or key changes.
#[derive(Debug, Clone, Serialize)]
pub struct ScanResult {
    pub id: Uuid,
    pub status: String,
    pub message: String,
    pub human_readable: String,
    pub risk_analysis: String,
    pub solutions: String,
    pub scan_data: serde_json::Value,
    pub project_id: Option<Uuid>,
    pub project_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied by the caller when inserting; `id` and `created_at` are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewScanResult {
    pub status: String,
    pub message: String,
    pub human_readable: String,
    pub risk_analysis: String,
    pub solutions: String,
    pub scan_data: serde_json::Value,
    pub project_id: Option<Uuid>,
    pub project_name: Option<String>,
}
