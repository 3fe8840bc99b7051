use axum::{Json, Router, extract::State, response::IntoResponse, routing::get};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::project::ProjectSummary;
use crate::{
    adapters::http::app_state::AppState, app_error::AppResult,
    domain::entities::principal::Credential,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/users/me", get(me))
}

#[derive(Serialize)]
struct ProfileResponse {
    id: Uuid,
    username: String,
    email: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    projects: Vec<ProjectSummary>,
}

/// GET /users/me
async fn me(
    State(app_state): State<AppState>,
    credential: Credential,
) -> AppResult<impl IntoResponse> {
    let principal = app_state
        .credential_verifier
        .resolve_account(&credential)
        .await?;
    let user = app_state.auth_use_cases.profile(&principal.identity).await?;

    Ok(Json(ProfileResponse {
        id: user.id,
        username: user.username,
        email: user.email,
        created_at: user.created_at,
        updated_at: user.updated_at,
        projects: user.projects.into_iter().map(ProjectSummary::from).collect(),
    }))
}
