use std::time::Duration;

use axum::http::header::{ACCEPT, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use dishpicker_core::AppError;
use tower_http::cors::CorsLayer;

const ALLOWED_METHODS: [Method; 5] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::PATCH,
    Method::DELETE,
];

const PREFLIGHT_MAX_AGE: Duration = Duration::from_secs(10 * 60);

/// Credentialed CORS for the single browser client at `frontend_url`.
pub(super) fn build_cors_layer(frontend_url: &str) -> Result<CorsLayer, AppError> {
    let origin = HeaderValue::from_str(frontend_url.trim_end_matches('/'))
        .map_err(|error| AppError::Internal(format!("invalid FRONTEND_URL: {error}")))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods(ALLOWED_METHODS)
        .allow_headers([CONTENT_TYPE, ACCEPT])
        .max_age(PREFLIGHT_MAX_AGE))
}
