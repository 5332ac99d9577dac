use serde::{Deserialize, Serialize};

/// A detection that survived the confidence filter, in display form:
/// confidence as a 0-100 percentage rounded to one decimal, polygon
/// rounded to integer pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentDetection {
    pub text: String,
    pub confidence: f32,
    pub polygon: [[i32; 2]; 4],
}

/// Aggregate statistics over a reconstructed document.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DocumentStats {
    pub char_count: u32,
    pub word_count: u32,
    pub line_count: u32,
    pub detection_count: u32,
    /// Mean confidence over emitted detections, as a 0-100 percentage
    /// rounded to one decimal. 0 when no detections survive the filter.
    pub avg_confidence: f32,
}

/// The output of reading-order reconstruction for one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentResult {
    /// Newline-joined reading-order text; detections within a line are
    /// joined by single spaces.
    pub text: String,
    pub detections: Vec<DocumentDetection>,
    pub stats: DocumentStats,
}

impl DocumentResult {
    pub fn empty() -> Self {
        Self {
            text: String::new(),
            detections: Vec::new(),
            stats: DocumentStats::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CacheStats {
    pub entry_count: u64,
}
