use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One record per processing event. Created once per successful scan,
/// immutable afterwards, deleted only by explicit user action, never by
/// the retention sweeper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    /// Stored artifact filename (collision-free).
    pub filename: String,
    /// Client-supplied filename, kept for display only.
    pub original_filename: String,
    pub text: String,
    /// Mean confidence of the scan, 0-100 percentage.
    pub confidence: f32,
    pub word_count: u32,
    pub char_count: u32,
    pub created_at: DateTime<Utc>,
    /// Path of the stored upload artifact. The file may have been
    /// reclaimed by the retention sweeper; a missing file is routine.
    pub artifact_path: String,
    /// Cross-reference into the result cache.
    pub content_fingerprint: String,
}
