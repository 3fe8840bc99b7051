use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    adapters::http::{app_state::AppState, extract::ApiJson},
    app_error::AppResult,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

#[derive(Deserialize)]
struct RegisterPayload {
    username: String,
    email: String,
    password: String,
}

#[derive(Deserialize)]
struct LoginPayload {
    email: String,
    password: String,
}

#[derive(Serialize)]
struct RegisteredUser {
    id: Uuid,
    username: String,
    email: String,
    created_at: DateTime<Utc>,
}

#[derive(Serialize)]
struct TokenResponse {
    access_token: String,
    token_type: &'static str,
    expires_in: i64,
}

/// POST /register
async fn register(
    State(app_state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterPayload>,
) -> AppResult<impl IntoResponse> {
    let user = app_state
        .auth_use_cases
        .register(&payload.username, &payload.email, &payload.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisteredUser {
            id: user.id,
            username: user.username,
            email: user.email,
            created_at: user.created_at,
        }),
    ))
}

/// POST /login
async fn login(
    State(app_state): State<AppState>,
    ApiJson(payload): ApiJson<LoginPayload>,
) -> AppResult<impl IntoResponse> {
    let token = app_state
        .auth_use_cases
        .login(&payload.email, &payload.password)
        .await?;

    Ok(Json(TokenResponse {
        access_token: token.token,
        token_type: "bearer",
        expires_in: token.expires_in_secs,
    }))
}
