use axum::Json;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};

use super::dto;
use super::handlers;
use super::response;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Lector API",
        version = "1.0.0",
        description = "Self-hostable OCR scan service. Reading-order reconstruction with content-addressed result caching.",
    ),
    paths(
        handlers::health::health_check,
        handlers::scans::create_scan,
        handlers::scans::batch_create_scans,
        handlers::history::list_history,
        handlers::history::get_history_entry,
        handlers::history::delete_history_entry,
        handlers::history::clear_history,
        handlers::cache::get_cache_stats,
        handlers::artifacts::serve_artifact,
        handlers::admin::run_retention,
        handlers::admin::clear_cache,
    ),
    components(schemas(
        // Response envelope
        response::ErrorCode,
        response::ApiError,
        response::ResponseMeta,
        // Scans
        dto::scan::DetectionDto,
        dto::scan::ScanStatsDto,
        dto::scan::ScanResponse,
        dto::scan::BatchScanItem,
        dto::scan::BatchScanResponse,
        // History
        dto::history::HistoryEntryResponse,
        dto::history::ListHistoryResponse,
        dto::history::DeleteHistoryResponse,
        dto::history::ClearHistoryResponse,
        // Cache & admin
        dto::admin::CacheStatsResponse,
        dto::admin::CacheClearResponse,
        dto::admin::RetentionRunResponse,
        // Health (handler-local types)
        handlers::health::HealthData,
        handlers::health::DatabaseStatus,
        handlers::health::EngineStatus,
    )),
    tags(
        (name = "health", description = "Health check"),
        (name = "scans", description = "Image upload and OCR reconstruction"),
        (name = "history", description = "Processing event history"),
        (name = "cache", description = "Content-addressed result cache"),
        (name = "artifacts", description = "Stored upload and processed images"),
        (name = "admin", description = "Administrative operations (auth required)"),
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            utoipa::openapi::security::SecurityScheme::Http(utoipa::openapi::security::Http::new(
                utoipa::openapi::security::HttpAuthScheme::Bearer,
            )),
        );
    }
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn redoc_router<S: Clone + Send + Sync + 'static>() -> axum::Router<S> {
    Redoc::with_url("/docs", ApiDoc::openapi()).into()
}
