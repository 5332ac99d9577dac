//! v1 History handlers.
//!
//! History entries record processing events and are removed only through
//! these routes, never by the retention sweeper.

use axum::extract::{Path, State};
use axum_extra::extract::Query;

use crate::api::v1::dto::{
    ClearHistoryResponse, DeleteHistoryResponse, HistoryEntryResponse, ListHistoryQuery,
    ListHistoryResponse,
};
use crate::api::v1::response::{ApiResponse, ErrorCode, ResponseMeta};
use crate::api::AppState;

/// `GET /api/v1/history`
///
/// Lists entries most recent first.
#[utoipa::path(
    get,
    path = "/api/v1/history",
    tag = "history",
    params(ListHistoryQuery),
    responses(
        (status = 200, description = "History entries, most recent first", body = ListHistoryResponse),
    )
)]
pub async fn list_history(
    State(state): State<AppState>,
    Query(query): Query<ListHistoryQuery>,
) -> ApiResponse<ListHistoryResponse> {
    let limit = query.limit.unwrap_or(20).clamp(1, 100);

    let entries = match state.history.list(limit).await {
        Ok(entries) => entries,
        Err(e) => return e.into(),
    };

    let total = entries.len() as u64;
    ApiResponse::success_with_meta(
        ListHistoryResponse {
            entries: entries.into_iter().map(HistoryEntryResponse::from).collect(),
        },
        ResponseMeta { total: Some(total) },
    )
}

/// `GET /api/v1/history/{entryId}`
#[utoipa::path(
    get,
    path = "/api/v1/history/{entryId}",
    tag = "history",
    params(("entryId" = String, Path, description = "History entry id")),
    responses(
        (status = 200, description = "History entry", body = HistoryEntryResponse),
        (status = 404, description = "Unknown entry", body = crate::api::v1::response::ApiError),
    )
)]
pub async fn get_history_entry(
    State(state): State<AppState>,
    Path(entry_id): Path<String>,
) -> ApiResponse<HistoryEntryResponse> {
    match state.history.get(&entry_id).await {
        Ok(Some(entry)) => ApiResponse::success(entry.into()),
        Ok(None) => ApiResponse::error(
            ErrorCode::NotFound,
            format!("History entry {entry_id} not found"),
        ),
        Err(e) => e.into(),
    }
}

/// `DELETE /api/v1/history/{entryId}`
///
/// Idempotent: deleting an unknown id succeeds with `deleted: false`.
#[utoipa::path(
    delete,
    path = "/api/v1/history/{entryId}",
    tag = "history",
    params(("entryId" = String, Path, description = "History entry id")),
    responses(
        (status = 200, description = "Deletion outcome", body = DeleteHistoryResponse),
    )
)]
pub async fn delete_history_entry(
    State(state): State<AppState>,
    Path(entry_id): Path<String>,
) -> ApiResponse<DeleteHistoryResponse> {
    match state.history.delete(&entry_id).await {
        Ok(deleted) => ApiResponse::success(DeleteHistoryResponse { deleted }),
        Err(e) => e.into(),
    }
}

/// `POST /api/v1/history:clear`
#[utoipa::path(
    post,
    path = "/api/v1/history:clear",
    tag = "history",
    responses(
        (status = 200, description = "History cleared", body = ClearHistoryResponse),
    )
)]
pub async fn clear_history(State(state): State<AppState>) -> ApiResponse<ClearHistoryResponse> {
    match state.history.clear().await {
        Ok(entries_removed) => ApiResponse::success(ClearHistoryResponse { entries_removed }),
        Err(e) => e.into(),
    }
}
