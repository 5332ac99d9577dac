//! v1 Cache handlers (read-only; eviction lives under `/admin`).

use axum::extract::State;

use crate::api::v1::dto::CacheStatsResponse;
use crate::api::v1::response::ApiResponse;
use crate::api::AppState;

/// `GET /api/v1/cache/stats`
#[utoipa::path(
    get,
    path = "/api/v1/cache/stats",
    tag = "cache",
    responses(
        (status = 200, description = "Cache statistics", body = CacheStatsResponse),
    )
)]
pub async fn get_cache_stats(State(state): State<AppState>) -> ApiResponse<CacheStatsResponse> {
    match state.cache.stats().await {
        Ok(stats) => ApiResponse::success(CacheStatsResponse {
            entry_count: stats.entry_count,
        }),
        Err(e) => e.into(),
    }
}
