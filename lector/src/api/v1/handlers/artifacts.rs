//! v1 Artifact serving.
//!
//! Serves stored upload and processed images by filename. The retention
//! sweeper deletes files from these directories independently of the
//! database, so a missing file is a routine 404, never a server error.

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};

use crate::api::v1::response::{ApiResponse, ErrorCode};
use crate::api::AppState;
use crate::storage::ArtifactKind;

/// `GET /api/v1/artifacts/{kind}/{filename}`
///
/// `kind` is `uploads` or `processed`.
#[utoipa::path(
    get,
    path = "/api/v1/artifacts/{kind}/{filename}",
    tag = "artifacts",
    params(
        ("kind" = String, Path, description = "Artifact area: uploads or processed"),
        ("filename" = String, Path, description = "Stored artifact filename"),
    ),
    responses(
        (status = 200, description = "Artifact bytes"),
        (status = 404, description = "Unknown kind or reclaimed artifact", body = crate::api::v1::response::ApiError),
    )
)]
pub async fn serve_artifact(
    State(state): State<AppState>,
    Path((kind, filename)): Path<(String, String)>,
) -> Response {
    let kind: ArtifactKind = match kind.parse() {
        Ok(kind) => kind,
        Err(_) => {
            return ApiResponse::<()>::error(
                ErrorCode::NotFound,
                format!("Unknown artifact kind: {kind}"),
            )
            .into_response();
        }
    };

    let path = match state.artifacts.resolve(kind, &filename) {
        Ok(path) => path,
        Err(e) => return ApiResponse::<()>::from(e).into_response(),
    };

    match tokio::fs::read(&path).await {
        Ok(bytes) => {
            let mime = mime_guess::from_path(&filename).first_or_octet_stream();
            ([(header::CONTENT_TYPE, mime.as_ref())], bytes).into_response()
        }
        Err(_) => ApiResponse::<()>::error(
            ErrorCode::NotFound,
            format!("Artifact {filename} not found"),
        )
        .into_response(),
    }
}
