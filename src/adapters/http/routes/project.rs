use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    adapters::http::{
        app_state::AppState,
        extract::{ApiJson, ApiPath},
    },
    app_error::AppResult,
    application::use_cases::api_key::DEFAULT_VALIDITY_DAYS,
    domain::entities::{
        api_key::{ApiKey, count_active},
        principal::Credential,
        project::Project,
    },
};

/// Project and key management. Full-account (bearer) callers only.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/projects", get(list_projects).post(create_project))
        .route("/projects/{project_id}", get(get_project))
        .route(
            "/projects/{project_id}/api-keys",
            get(list_api_keys).post(create_api_key),
        )
        .route("/projects/{project_id}/api-keys/{key}", delete(revoke_api_key))
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
struct CreateProjectPayload {
    project_name: String,
    project_description: Option<String>,
}

#[derive(Deserialize, Default)]
struct CreateApiKeyPayload {
    validity_days: Option<i64>,
}

#[derive(Serialize)]
pub(super) struct ProjectSummary {
    project_id: Uuid,
    project_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    project_description: Option<String>,
    created_at: DateTime<Utc>,
    active_api_keys: usize,
}

impl From<Project> for ProjectSummary {
    fn from(project: Project) -> Self {
        Self {
            active_api_keys: count_active(&project.api_keys),
            project_id: project.project_id,
            project_name: project.project_name,
            project_description: project.project_description,
            created_at: project.created_at,
        }
    }
}

#[derive(Serialize)]
struct ApiKeyResponse {
    key: String,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    is_active: bool,
    is_expired: bool,
}

impl ApiKeyResponse {
    fn new(key: ApiKey, now: DateTime<Utc>) -> Self {
        Self {
            is_expired: key.is_expired(now),
            key: key.key,
            created_at: key.created_at,
            expires_at: key.expires_at,
            is_active: key.is_active,
        }
    }
}

#[derive(Serialize)]
struct ProjectDetail {
    #[serde(flatten)]
    summary: ProjectSummary,
    api_keys: Vec<ApiKeyResponse>,
}

#[derive(Serialize)]
struct RevokeResponse {
    removed: bool,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /projects
async fn create_project(
    State(app_state): State<AppState>,
    credential: Credential,
    ApiJson(payload): ApiJson<CreateProjectPayload>,
) -> AppResult<impl IntoResponse> {
    let principal = app_state
        .credential_verifier
        .resolve_account(&credential)
        .await?;
    let project = app_state
        .project_use_cases
        .create_project(
            &principal.identity,
            &payload.project_name,
            payload.project_description.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(ProjectSummary::from(project))))
}

/// GET /projects
async fn list_projects(
    State(app_state): State<AppState>,
    credential: Credential,
) -> AppResult<impl IntoResponse> {
    let principal = app_state
        .credential_verifier
        .resolve_account(&credential)
        .await?;
    let projects = app_state
        .project_use_cases
        .list_projects(&principal.identity)
        .await?;

    Ok(Json(
        projects
            .into_iter()
            .map(ProjectSummary::from)
            .collect::<Vec<_>>(),
    ))
}

/// GET /projects/{project_id}
async fn get_project(
    State(app_state): State<AppState>,
    credential: Credential,
    ApiPath(project_id): ApiPath<Uuid>,
) -> AppResult<impl IntoResponse> {
    let principal = app_state
        .credential_verifier
        .resolve_account(&credential)
        .await?;
    let project = app_state
        .project_use_cases
        .get_project(&principal.identity, project_id)
        .await?;

    let now = Utc::now();
    let api_keys = project.api_keys.clone();

    Ok(Json(ProjectDetail {
        summary: ProjectSummary::from(project),
        api_keys: api_keys
            .into_iter()
            .map(|k| ApiKeyResponse::new(k, now))
            .collect(),
    }))
}

/// GET /projects/{project_id}/api-keys
async fn list_api_keys(
    State(app_state): State<AppState>,
    credential: Credential,
    ApiPath(project_id): ApiPath<Uuid>,
) -> AppResult<impl IntoResponse> {
    let principal = app_state
        .credential_verifier
        .resolve_account(&credential)
        .await?;
    let keys = app_state
        .api_key_use_cases
        .list_keys(&principal.identity, project_id)
        .await?;

    let now = Utc::now();
    Ok(Json(
        keys.into_iter()
            .map(|k| ApiKeyResponse::new(k, now))
            .collect::<Vec<_>>(),
    ))
}

/// POST /projects/{project_id}/api-keys
/// An empty body issues a key with the default validity.
async fn create_api_key(
    State(app_state): State<AppState>,
    credential: Credential,
    ApiPath(project_id): ApiPath<Uuid>,
    payload: Option<ApiJson<CreateApiKeyPayload>>,
) -> AppResult<impl IntoResponse> {
    let principal = app_state
        .credential_verifier
        .resolve_account(&credential)
        .await?;
    let validity_days = payload
        .and_then(|ApiJson(p)| p.validity_days)
        .unwrap_or(DEFAULT_VALIDITY_DAYS);

    let key = app_state
        .api_key_use_cases
        .create_key(&principal.identity, project_id, validity_days)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiKeyResponse::new(key, Utc::now()))))
}

/// DELETE /projects/{project_id}/api-keys/{key}
async fn revoke_api_key(
    State(app_state): State<AppState>,
    credential: Credential,
    ApiPath((project_id, key)): ApiPath<(Uuid, String)>,
) -> AppResult<impl IntoResponse> {
    let principal = app_state
        .credential_verifier
        .resolve_account(&credential)
        .await?;
    let removed = app_state
        .api_key_use_cases
        .revoke_key(&principal.identity, project_id, &key)
        .await?;

    Ok(Json(RevokeResponse { removed }))
}
