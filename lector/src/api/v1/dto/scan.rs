use serde::{Deserialize, Serialize};

use crate::models::{DocumentDetection, DocumentStats};
use crate::services::ScanOutcome;

/// One emitted detection in display form.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct DetectionDto {
    pub text: String,
    /// Confidence as a 0-100 percentage, one decimal.
    pub confidence: f32,
    /// Integer-rounded polygon, four `[x, y]` corners.
    #[schema(value_type = Vec<Vec<i32>>)]
    pub polygon: [[i32; 2]; 4],
}

impl From<DocumentDetection> for DetectionDto {
    fn from(det: DocumentDetection) -> Self {
        Self {
            text: det.text,
            confidence: det.confidence,
            polygon: det.polygon,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScanStatsDto {
    pub char_count: u32,
    pub word_count: u32,
    pub line_count: u32,
    pub detection_count: u32,
    pub avg_confidence: f32,
}

impl From<DocumentStats> for ScanStatsDto {
    fn from(stats: DocumentStats) -> Self {
        Self {
            char_count: stats.char_count,
            word_count: stats.word_count,
            line_count: stats.line_count,
            detection_count: stats.detection_count,
            avg_confidence: stats.avg_confidence,
        }
    }
}

/// Response for `POST /api/v1/scans`.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScanResponse {
    /// History entry recorded for this processing event.
    pub entry_id: String,
    /// Content fingerprint of the uploaded bytes.
    pub fingerprint: String,
    /// True when the result was served from the cache without invoking
    /// the recognition engine.
    pub from_cache: bool,
    /// Reading-order text.
    pub text: String,
    pub stats: ScanStatsDto,
    pub detections: Vec<DetectionDto>,
    /// Stored upload artifact name, servable via the artifacts endpoint.
    pub uploaded: String,
    /// Box-annotated artifact name, when annotation was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotated: Option<String>,
    /// Degraded-mode notices (e.g. the result could not be cached).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl From<ScanOutcome> for ScanResponse {
    fn from(outcome: ScanOutcome) -> Self {
        Self {
            entry_id: outcome.entry_id,
            fingerprint: outcome.fingerprint,
            from_cache: outcome.from_cache,
            text: outcome.result.text,
            stats: outcome.result.stats.into(),
            detections: outcome
                .result
                .detections
                .into_iter()
                .map(DetectionDto::from)
                .collect(),
            uploaded: outcome.uploaded_filename,
            annotated: outcome.annotated_filename,
            warnings: outcome.warnings,
        }
    }
}

/// One per-file outcome in a batch response. Exactly one of `data` and
/// `error` is present.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BatchScanItem {
    /// Client-supplied filename this outcome refers to.
    pub filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ScanResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Response for `POST /api/v1/scans:batch`.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BatchScanResponse {
    pub results: Vec<BatchScanItem>,
}
