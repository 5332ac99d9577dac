use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::HistoryEntry;

/// Query parameters for `GET /api/v1/history`.
#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams)]
pub struct ListHistoryQuery {
    /// Maximum number of entries to return. Clamped to `1..=100`,
    /// defaults to 20.
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntryResponse {
    pub id: String,
    pub filename: String,
    pub original_filename: String,
    pub text: String,
    pub confidence: f32,
    pub word_count: u32,
    pub char_count: u32,
    #[schema(value_type = String)]
    pub created_at: DateTime<Utc>,
    /// Path of the stored upload artifact. The file may already have been
    /// reclaimed by retention; resolve via the artifacts endpoint and
    /// expect 404 as a routine outcome.
    pub artifact_path: String,
    pub content_fingerprint: String,
}

impl From<HistoryEntry> for HistoryEntryResponse {
    fn from(entry: HistoryEntry) -> Self {
        Self {
            id: entry.id,
            filename: entry.filename,
            original_filename: entry.original_filename,
            text: entry.text,
            confidence: entry.confidence,
            word_count: entry.word_count,
            char_count: entry.char_count,
            created_at: entry.created_at,
            artifact_path: entry.artifact_path,
            content_fingerprint: entry.content_fingerprint,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListHistoryResponse {
    pub entries: Vec<HistoryEntryResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteHistoryResponse {
    /// False when the id did not exist; deletion is idempotent either way.
    pub deleted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClearHistoryResponse {
    pub entries_removed: u64,
}
