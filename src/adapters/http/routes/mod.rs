pub mod auth;
pub mod project;
pub mod scan;
pub mod user;

use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::adapters::http::app_state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(health_check))
        .merge(auth::router())
        .merge(user::router())
        .merge(project::router())
        .merge(scan::router())
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    message: &'static str,
}

/// GET /
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        message: "SecAI DevSecOps Assistant is running",
    })
}
