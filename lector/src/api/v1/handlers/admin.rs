//! v1 Admin handlers.

use axum::extract::State;

use crate::api::v1::dto::{CacheClearResponse, RetentionRunResponse};
use crate::api::v1::response::{ApiResponse, ErrorCode};
use crate::api::AppState;

/// `POST /api/v1/admin/retention:run`
///
/// Runs one retention sweep on demand, independent of the background
/// interval loop.
#[utoipa::path(
    post,
    path = "/api/v1/admin/retention:run",
    tag = "admin",
    responses(
        (status = 200, description = "Sweep completed", body = RetentionRunResponse),
    ),
    security(("bearer_auth" = []))
)]
pub async fn run_retention(State(state): State<AppState>) -> ApiResponse<RetentionRunResponse> {
    match state.retention.run_once().await {
        Ok(files_removed) => ApiResponse::success(RetentionRunResponse { files_removed }),
        Err(e) => ApiResponse::error(
            ErrorCode::InternalError,
            format!("Retention sweep failed: {e}"),
        ),
    }
}

/// `POST /api/v1/admin/cache:clear`
///
/// Full cache eviction. Irreversible; history is untouched.
#[utoipa::path(
    post,
    path = "/api/v1/admin/cache:clear",
    tag = "admin",
    responses(
        (status = 200, description = "Cache cleared", body = CacheClearResponse),
    ),
    security(("bearer_auth" = []))
)]
pub async fn clear_cache(State(state): State<AppState>) -> ApiResponse<CacheClearResponse> {
    match state.cache.clear().await {
        Ok(entries_removed) => ApiResponse::success(CacheClearResponse { entries_removed }),
        Err(e) => e.into(),
    }
}
