use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    response::IntoResponse,
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    adapters::http::{app_state::AppState, extract::ApiPath},
    app_error::AppResult,
    domain::entities::principal::Credential,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/scan", post(submit_scan))
        .route("/projects/{project_id}/scan", post(submit_project_scan))
        .route("/projects/{project_id}/scan-results", get(list_project_results))
        .route("/scan-results/{scan_id}", get(get_scan_result))
}

/// POST /projects/{project_id}/scan
/// The body is the raw scan report (any JSON document).
async fn submit_project_scan(
    State(app_state): State<AppState>,
    credential: Credential,
    ApiPath(project_id): ApiPath<Uuid>,
    body: Bytes,
) -> AppResult<impl IntoResponse> {
    let principal = app_state
        .credential_verifier
        .resolve_for_project(&credential, project_id)
        .await?;
    let result = app_state
        .scan_use_cases
        .submit_scan(&principal, &body)
        .await?;
    Ok(Json(result))
}

/// POST /scan
async fn submit_scan(
    State(app_state): State<AppState>,
    credential: Credential,
    body: Bytes,
) -> AppResult<impl IntoResponse> {
    let principal = app_state.credential_verifier.resolve(&credential).await?;
    let result = app_state
        .scan_use_cases
        .submit_scan(&principal, &body)
        .await?;
    Ok(Json(result))
}

/// GET /projects/{project_id}/scan-results
async fn list_project_results(
    State(app_state): State<AppState>,
    credential: Credential,
    ApiPath(project_id): ApiPath<Uuid>,
) -> AppResult<impl IntoResponse> {
    app_state
        .credential_verifier
        .resolve_for_project(&credential, project_id)
        .await?;
    let results = app_state
        .scan_use_cases
        .list_project_results(project_id)
        .await?;
    Ok(Json(results))
}

/// GET /scan-results/{scan_id}
async fn get_scan_result(
    State(app_state): State<AppState>,
    credential: Credential,
    ApiPath(scan_id): ApiPath<Uuid>,
) -> AppResult<impl IntoResponse> {
    let principal = app_state.credential_verifier.resolve(&credential).await?;
    let result = app_state
        .scan_use_cases
        .get_result(&principal, scan_id)
        .await?;
    Ok(Json(result))
}
