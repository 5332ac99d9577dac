//! v1 Scan handlers.
//!
//! A scan request uploads one (or, for the batch route, several) images
//! as multipart form data and receives the reading-order reconstruction
//! synchronously. Per-file failures in a batch never abort the other
//! files.

use axum::extract::{Multipart, State};

use crate::api::v1::dto::{BatchScanItem, BatchScanResponse, ScanResponse};
use crate::api::v1::response::{ApiResponse, ErrorCode};
use crate::api::AppState;
use crate::engine::EngineProfileKind;
use crate::services::ScanOptions;

fn parse_form_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

struct ScanForm {
    files: Vec<(String, Vec<u8>)>,
    options: ScanOptions,
}

enum FormError {
    Invalid(String),
}

async fn read_scan_form(
    mut multipart: Multipart,
    max_upload_bytes: usize,
) -> Result<ScanForm, FormError> {
    let mut files: Vec<(String, Vec<u8>)> = Vec::new();
    let mut options = ScanOptions::default();

    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or("").to_string();
                if filename.is_empty() {
                    return Err(FormError::Invalid("File field has no filename".into()));
                }

                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| FormError::Invalid(format!("Failed to read file: {e}")))?;

                if bytes.len() > max_upload_bytes {
                    return Err(FormError::Invalid(format!(
                        "File too large: {} bytes (max {} bytes)",
                        bytes.len(),
                        max_upload_bytes
                    )));
                }

                files.push((filename, bytes.to_vec()));
            }
            "minConfidence" | "min_confidence" => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| FormError::Invalid(format!("Invalid minConfidence: {e}")))?;
                let value: f32 = raw
                    .trim()
                    .parse()
                    .map_err(|_| FormError::Invalid("minConfidence must be a number".into()))?;
                if !(0.0..=1.0).contains(&value) {
                    return Err(FormError::Invalid(
                        "minConfidence must be within [0, 1]".into(),
                    ));
                }
                options.min_confidence = Some(value);
            }
            "profile" => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| FormError::Invalid(format!("Invalid profile: {e}")))?;
                let kind: EngineProfileKind =
                    raw.parse().map_err(|e: String| FormError::Invalid(e))?;
                options.profile = Some(kind);
            }
            "enhance" => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| FormError::Invalid(format!("Invalid enhance value: {e}")))?;
                match parse_form_bool(&raw) {
                    Some(value) => options.enhance = Some(value),
                    None => {
                        return Err(FormError::Invalid(
                            "enhance must be one of true/false/1/0/yes/no".into(),
                        ));
                    }
                }
            }
            "annotate" => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| FormError::Invalid(format!("Invalid annotate value: {e}")))?;
                match parse_form_bool(&raw) {
                    Some(value) => options.annotate = value,
                    None => {
                        return Err(FormError::Invalid(
                            "annotate must be one of true/false/1/0/yes/no".into(),
                        ));
                    }
                }
            }
            _ => {}
        }
    }

    Ok(ScanForm { files, options })
}

/// `POST /api/v1/scans`
///
/// Processes a single uploaded image and returns the reconstruction.
/// Identical bytes uploaded twice are served from the result cache on the
/// second request without invoking the recognition engine.
#[utoipa::path(
    post,
    path = "/api/v1/scans",
    tag = "scans",
    operation_id = "scans.create",
    request_body(content_type = "multipart/form-data", content = String, description = "Image upload with optional minConfidence, profile, enhance, and annotate fields"),
    responses(
        (status = 200, description = "Scan processed", body = ScanResponse),
        (status = 400, description = "Invalid upload", body = crate::api::v1::response::ApiError),
        (status = 502, description = "Recognition engine failed", body = crate::api::v1::response::ApiError),
    )
)]
pub async fn create_scan(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResponse<ScanResponse> {
    let form = match read_scan_form(multipart, state.config.storage.max_upload_bytes).await {
        Ok(form) => form,
        Err(FormError::Invalid(msg)) => return ApiResponse::error(ErrorCode::InvalidRequest, msg),
    };

    let mut files = form.files;
    let (filename, bytes) = match files.len() {
        0 => {
            return ApiResponse::error(ErrorCode::InvalidRequest, "Missing required 'file' field")
        }
        1 => files.remove(0),
        _ => {
            return ApiResponse::error(
                ErrorCode::InvalidRequest,
                "Multiple files; use /scans:batch for batch processing",
            )
        }
    };

    match state.scans.process_upload(&filename, &bytes, &form.options).await {
        Ok(outcome) => ApiResponse::success(outcome.into()),
        Err(e) => e.into(),
    }
}

/// `POST /api/v1/scans:batch`
///
/// Processes several uploads in one request. Always returns per-file
/// outcomes: files that succeed are reported even when others fail.
#[utoipa::path(
    post,
    path = "/api/v1/scans:batch",
    tag = "scans",
    operation_id = "scans.batch",
    request_body(content_type = "multipart/form-data", content = String, description = "Repeated file fields with shared option fields"),
    responses(
        (status = 200, description = "Per-file outcomes", body = BatchScanResponse),
        (status = 400, description = "Invalid request", body = crate::api::v1::response::ApiError),
    )
)]
pub async fn batch_create_scans(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResponse<BatchScanResponse> {
    let form = match read_scan_form(multipart, state.config.storage.max_upload_bytes).await {
        Ok(form) => form,
        Err(FormError::Invalid(msg)) => return ApiResponse::error(ErrorCode::InvalidRequest, msg),
    };

    if form.files.is_empty() {
        return ApiResponse::error(ErrorCode::InvalidRequest, "No 'file' fields in request");
    }

    let outcomes = state.scans.process_batch(form.files, &form.options).await;

    let results = outcomes
        .into_iter()
        .map(|(filename, outcome)| match outcome {
            Ok(outcome) => BatchScanItem {
                filename,
                data: Some(outcome.into()),
                error: None,
            },
            Err(e) => BatchScanItem {
                filename,
                data: None,
                error: Some(e.to_string()),
            },
        })
        .collect();

    ApiResponse::success(BatchScanResponse { results })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_form_bool_accepts_common_spellings() {
        assert_eq!(parse_form_bool("true"), Some(true));
        assert_eq!(parse_form_bool("ON"), Some(true));
        assert_eq!(parse_form_bool("0"), Some(false));
        assert_eq!(parse_form_bool("maybe"), None);
    }
}
