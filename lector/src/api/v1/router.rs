use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::api::state::AppState;

use super::handlers;
use super::middleware::admin_auth_middleware;

pub fn v1_router(state: AppState) -> Router<AppState> {
    let history = Router::new()
        .route("/", get(handlers::history::list_history))
        .route(
            "/{entryId}",
            get(handlers::history::get_history_entry)
                .delete(handlers::history::delete_history_entry),
        );

    let public_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/openapi.json", get(super::openapi::openapi_json))
        .merge(super::openapi::redoc_router())
        .route("/scans", post(handlers::scans::create_scan))
        .route("/scans:batch", post(handlers::scans::batch_create_scans))
        .nest("/history", history)
        .route("/history:clear", post(handlers::history::clear_history))
        .route("/cache/stats", get(handlers::cache::get_cache_stats))
        .route(
            "/artifacts/{kind}/{filename}",
            get(handlers::artifacts::serve_artifact),
        );

    let admin_routes = Router::new()
        .route("/admin/retention:run", post(handlers::admin::run_retention))
        .route("/admin/cache:clear", post(handlers::admin::clear_cache))
        .route_layer(middleware::from_fn_with_state(state, admin_auth_middleware));

    Router::new().merge(public_routes).merge(admin_routes)
}
