use std::time::Duration;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http,
    middleware,
    response::{IntoResponse, Response},
};
use http::header::{AUTHORIZATION, CONTENT_TYPE, HeaderName};
use tower_http::{
    cors::CorsLayer, set_header::SetResponseHeaderLayer, timeout::TimeoutLayer,
    trace::TraceLayer,
};
use uuid::Uuid;

use crate::{
    adapters::{
        self,
        http::{
            app_state::AppState, credential::API_KEY_HEADER, middleware::rate_limit_middleware,
        },
    },
    app_error::AppError,
};

/// Headroom on top of the three generation stages before the whole request is abandoned.
const REQUEST_TIMEOUT_SLACK: Duration = Duration::from_secs(10);

pub fn create_app(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(app_state.config.cors_origin.clone())
        .allow_methods([http::Method::GET, http::Method::POST, http::Method::DELETE])
        .allow_headers([
            CONTENT_TYPE,
            AUTHORIZATION,
            HeaderName::from_static(API_KEY_HEADER),
        ])
        .allow_credentials(true);

    let request_timeout = app_state.config.llm.timeout * 3 + REQUEST_TIMEOUT_SLACK;
    let body_limit = app_state.config.max_scan_body_bytes;

    let routes = Router::new()
        .merge(adapters::http::routes::router())
        .with_state(app_state.clone())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(middleware::from_fn_with_state(
            app_state,
            rate_limit_middleware,
        ));

    with_request_timeout(routes, request_timeout)
        .layer(cors)
        .layer(SetResponseHeaderLayer::if_not_present(
            http::header::X_CONTENT_TYPE_OPTIONS,
            http::HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            http::header::X_FRAME_OPTIONS,
            http::HeaderValue::from_static("DENY"),
        ))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &http::Request<_>| {
                let request_id = Uuid::new_v4();
                tracing::info_span!(
                    "http-request",
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                    request_id = %request_id
                )
            }),
        )
}

/// Abandon requests running past `timeout`, answering 408 with the usual error body.
fn with_request_timeout(router: Router, timeout: Duration) -> Router {
    router
        .layer(TimeoutLayer::with_status_code(
            http::StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .layer(middleware::map_response(timeout_error_body))
}

// Handlers never answer 408, so any 408 here came from the timeout layer with an empty body.
async fn timeout_error_body(response: Response) -> Response {
    if response.status() == http::StatusCode::REQUEST_TIMEOUT {
        return AppError::RequestTimeout.into_response();
    }
    response
}
