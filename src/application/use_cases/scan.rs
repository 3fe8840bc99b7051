use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::instrument;
use uuid::Uuid;

use crate::app_error::{AppError, AppResult};
use crate::application::pipeline::ScanPipeline;
use crate::application::use_cases::project::ProjectRepo;
use crate::domain::entities::principal::Principal;
use crate::domain::entities::scan_result::{NewScanResult, ScanResult};

pub const SCAN_STATUS_SUCCESS: &str = "success";
pub const SCAN_MESSAGE_COMPLETED: &str = "Scan analysis completed";

// ============================================================================
// Repository Trait
// ============================================================================

#[async_trait]
pub trait ScanResultRepo: Send + Sync {
    async fn insert_scan_result(&self, result: &NewScanResult) -> AppResult<ScanResult>;

    /// Newest first.
    async fn list_scan_results_by_project(&self, project_id: Uuid) -> AppResult<Vec<ScanResult>>;

    async fn get_scan_result(&self, id: Uuid) -> AppResult<Option<ScanResult>>;
}

// ============================================================================
// Use Cases
// ============================================================================

#[derive(Clone)]
pub struct ScanUseCases {
    pipeline: ScanPipeline,
    results: Arc<dyn ScanResultRepo>,
    projects: Arc<dyn ProjectRepo>,
    shutdown: CancellationToken,
}

impl ScanUseCases {
    pub fn new(
        pipeline: ScanPipeline,
        results: Arc<dyn ScanResultRepo>,
        projects: Arc<dyn ProjectRepo>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            pipeline,
            results,
            projects,
            shutdown,
        }
    }

    /// Parse, analyse and persist a scan report.
    ///
    /// The stored record carries the principal's project tag when it has one.
    /// Nothing is written unless all stages succeed.
    #[instrument(skip(self, body), fields(identity = %principal.identity, bytes = body.len()))]
    pub async fn submit_scan(&self, principal: &Principal, body: &[u8]) -> AppResult<ScanResult> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(AppError::MalformedInput("Request body is empty".into()));
        }
        let raw_scan_data: Value = serde_json::from_slice(body)
            .map_err(|e| AppError::MalformedInput(format!("Invalid JSON: {e}")))?;

        let state = self.pipeline.run(raw_scan_data, &self.shutdown).await?;

        let (project_id, project_name) = match &principal.scope {
            Some(scope) => (Some(scope.project_id), Some(scope.project_name.clone())),
            None => (None, None),
        };
        let stored = self
            .results
            .insert_scan_result(&NewScanResult {
                status: SCAN_STATUS_SUCCESS.to_string(),
                message: SCAN_MESSAGE_COMPLETED.to_string(),
                human_readable: state.human_readable,
                risk_analysis: state.risk_analysis,
                solutions: state.solutions,
                scan_data: state.raw_scan_data,
                project_id,
                project_name,
            })
            .await?;

        tracing::info!(scan_id = %stored.id, project_id = ?stored.project_id, "Scan result stored");
        Ok(stored)
    }

    /// Results tagged with `project_id`. The caller must already be authorized for the project.
    pub async fn list_project_results(&self, project_id: Uuid) -> AppResult<Vec<ScanResult>> {
        self.results.list_scan_results_by_project(project_id).await
    }

    /// Fetch one result if `principal` may see its project.
    pub async fn get_result(&self, principal: &Principal, id: Uuid) -> AppResult<ScanResult> {
        let result = self
            .results
            .get_scan_result(id)
            .await?
            .ok_or(AppError::NotFound)?;
        let Some(project_id) = result.project_id else {
            return Err(AppError::NotFound);
        };

        let visible = match &principal.scope {
            Some(scope) => scope.project_id == project_id,
            None => matches!(
                self.projects.find_project_by_id(project_id).await?,
                Some(found) if found.owner_email == principal.identity
            ),
        };
        if !visible {
            return Err(AppError::NotFound);
        }
        Ok(result)
    }
}
