//! # V1 Admin Authentication Middleware
//!
//! Protects `/admin/*` routes with Bearer token authentication, validated
//! against the `LECTOR_API_KEYS` configuration. Scan and history routes
//! stay public; only destructive administrative operations (manual
//! retention sweep, cache eviction) sit behind this guard.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::api::state::AppState;

use super::response::{ApiResponse, ErrorCode};

/// Axum middleware that enforces Bearer token authentication.
///
/// # Behavior
///
/// - If `LECTOR_API_KEYS` is empty/unset → 401. The server still starts,
///   but admin routes are locked down.
/// - If the `Authorization: Bearer <token>` header is missing or
///   malformed → 401.
/// - If the token is not in the configured key list → 401.
pub async fn admin_auth_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if state.config.server.api_keys.is_empty() {
        return ApiResponse::<()>::error(
            ErrorCode::Unauthorized,
            "API keys not configured. Set LECTOR_API_KEYS to enable admin access.",
        )
        .into_response();
    }

    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(h) if h.starts_with("Bearer ") => &h[7..],
        Some(_) => {
            return ApiResponse::<()>::error(
                ErrorCode::Unauthorized,
                "Authorization header must use the Bearer scheme",
            )
            .into_response();
        }
        None => {
            return ApiResponse::<()>::error(
                ErrorCode::Unauthorized,
                "Missing Authorization header",
            )
            .into_response();
        }
    };

    if !state.config.server.api_keys.iter().any(|k| k == token) {
        return ApiResponse::<()>::error(ErrorCode::Unauthorized, "Invalid API key")
            .into_response();
    }

    next.run(request).await
}
