use chrono::Utc;
use nanoid::nanoid;
use tracing::{info, warn};

use crate::config::{Config, EnhanceConfig, ReconstructConfig};
use crate::engine::{
    draw_detection_boxes, enhance_image, EngineProfile, EngineProfileKind, EngineProvider,
};
use crate::error::{LectorError, Result};
use crate::fingerprint::fingerprint_bytes;
use crate::models::{DocumentResult, HistoryEntry};
use crate::reconstruct::Reconstructor;
use crate::services::{HistoryLog, ResultCache};
use crate::storage::{ArtifactStore, BOXED_PREFIX, PRE_PREFIX};

/// Per-request knobs. Anything unset falls back to configuration.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    pub min_confidence: Option<f32>,
    pub profile: Option<EngineProfileKind>,
    /// Enhancement defaults to on for the accurate profile and off for
    /// quick, matching the profiles' speed intent.
    pub enhance: Option<bool>,
    pub annotate: bool,
}

#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub entry_id: String,
    pub fingerprint: String,
    pub from_cache: bool,
    pub result: DocumentResult,
    /// Stored (collision-free) upload filename.
    pub uploaded_filename: String,
    /// Filename of the box-annotated artifact, when annotation was
    /// requested and succeeded.
    pub annotated_filename: Option<String>,
    /// Degraded-mode notices: the scan itself succeeded but some
    /// best-effort persistence step did not.
    pub warnings: Vec<String>,
}

/// Runs one scan request to completion:
/// fingerprint → cache probe → [enhance → recognize → reconstruct] →
/// cache store → history append.
#[derive(Clone)]
pub struct ScanService {
    engine: EngineProvider,
    cache: ResultCache,
    history: HistoryLog,
    artifacts: ArtifactStore,
    reconstruct: ReconstructConfig,
    enhance: EnhanceConfig,
}

impl ScanService {
    pub fn new(
        engine: EngineProvider,
        cache: ResultCache,
        history: HistoryLog,
        artifacts: ArtifactStore,
        config: &Config,
    ) -> Self {
        Self {
            engine,
            cache,
            history,
            artifacts,
            reconstruct: config.reconstruct.clone(),
            enhance: config.enhance.clone(),
        }
    }

    /// Process one uploaded image.
    ///
    /// On a cache hit the recognition engine is not invoked at all: the
    /// cached entry carries detection geometry, so even annotation is
    /// served from it. A history event is appended either way.
    pub async fn process_upload(
        &self,
        original_filename: &str,
        bytes: &[u8],
        opts: &ScanOptions,
    ) -> Result<ScanOutcome> {
        if bytes.is_empty() {
            return Err(LectorError::InvalidInput("Empty upload".to_string()));
        }
        if ArtifactStore::allowed_extension(original_filename).is_none() {
            return Err(LectorError::InvalidInput(format!(
                "Unsupported file type: {original_filename}"
            )));
        }
        if image::guess_format(bytes).is_err() {
            return Err(LectorError::InvalidInput(
                "Upload is not a recognizable image".to_string(),
            ));
        }

        let fingerprint = fingerprint_bytes(bytes);

        if let Some(result) = self.cache.lookup(&fingerprint).await? {
            info!(fingerprint = %fingerprint, "Cache hit, engine not invoked");
            return self
                .finish_from_cache(original_filename, bytes, opts, fingerprint, result)
                .await;
        }

        let mut warnings = Vec::new();

        let upload = self.artifacts.save_upload(original_filename, bytes).await?;

        let profile_kind = opts
            .profile
            .unwrap_or_else(|| self.engine.default_profile_kind());
        let profile = EngineProfile::for_kind(profile_kind);
        let enhance_on = opts
            .enhance
            .unwrap_or(profile_kind == EngineProfileKind::Accurate);

        // The engine input buffer; detection coordinates are relative to
        // whichever buffer this ends up being.
        let engine_input: Vec<u8>;
        if enhance_on {
            engine_input = enhance_image(bytes, &self.enhance)?;
            if let Err(e) = self
                .artifacts
                .save_processed(PRE_PREFIX, &upload.filename, &engine_input)
                .await
            {
                warn!(error = %e, "Failed to store enhanced artifact");
                warnings.push(format!("Enhanced image not stored: {e}"));
            }
        } else {
            engine_input = bytes.to_vec();
        }

        // Engine failure aborts with no cache or history mutation; the
        // artifacts written above stay behind for the retention sweeper.
        let detections = self.engine.recognize(&engine_input, &profile).await?;

        let reconstructor = Reconstructor::new(
            self.reconstruct.line_threshold,
            opts.min_confidence.unwrap_or(self.reconstruct.min_confidence),
        );
        let result = reconstructor.reconstruct(&detections);

        let annotated_filename = if opts.annotate {
            self.try_annotate(&engine_input, &upload.filename, &result, &mut warnings)
                .await
        } else {
            None
        };

        // Cache population happens-before the history append for this
        // event. Either store failing downgrades to a warning: the
        // computed result is not discarded.
        if let Err(e) = self.cache.store(&fingerprint, &result).await {
            warn!(fingerprint = %fingerprint, error = %e, "Failed to store cache entry");
            warnings.push(format!("Result not cached: {e}"));
        }

        let entry = self.build_history_entry(&upload.filename, original_filename, &fingerprint, &result);
        if let Err(e) = self.history.append(&entry).await {
            warn!(entry_id = %entry.id, error = %e, "Failed to append history entry");
            warnings.push(format!("History entry not recorded: {e}"));
        }

        Ok(ScanOutcome {
            entry_id: entry.id,
            fingerprint,
            from_cache: false,
            result,
            uploaded_filename: upload.filename,
            annotated_filename,
            warnings,
        })
    }

    /// Process a batch of uploads, isolating per-file failures: one bad
    /// file never aborts the rest.
    pub async fn process_batch(
        &self,
        files: Vec<(String, Vec<u8>)>,
        opts: &ScanOptions,
    ) -> Vec<(String, Result<ScanOutcome>)> {
        let mut outcomes = Vec::with_capacity(files.len());
        for (filename, bytes) in files {
            let outcome = self.process_upload(&filename, &bytes, opts).await;
            if let Err(ref e) = outcome {
                warn!(filename = %filename, error = %e, "Batch item failed");
            }
            outcomes.push((filename, outcome));
        }
        outcomes
    }

    async fn finish_from_cache(
        &self,
        original_filename: &str,
        bytes: &[u8],
        opts: &ScanOptions,
        fingerprint: String,
        result: DocumentResult,
    ) -> Result<ScanOutcome> {
        let mut warnings = Vec::new();

        // The event still stores its upload artifact so the history
        // entry's path resolves until retention reclaims it.
        let upload = self.artifacts.save_upload(original_filename, bytes).await?;

        let annotated_filename = if opts.annotate {
            // Cached polygons are relative to the buffer the engine saw.
            // Enhancement is deterministic, so re-applying it to the
            // identical bytes reproduces that buffer.
            let profile_kind = opts
                .profile
                .unwrap_or_else(|| self.engine.default_profile_kind());
            let enhance_on = opts
                .enhance
                .unwrap_or(profile_kind == EngineProfileKind::Accurate);
            let buffer = if enhance_on {
                enhance_image(bytes, &self.enhance)?
            } else {
                bytes.to_vec()
            };
            self.try_annotate(&buffer, &upload.filename, &result, &mut warnings)
                .await
        } else {
            None
        };

        let entry = self.build_history_entry(&upload.filename, original_filename, &fingerprint, &result);
        if let Err(e) = self.history.append(&entry).await {
            warn!(entry_id = %entry.id, error = %e, "Failed to append history entry");
            warnings.push(format!("History entry not recorded: {e}"));
        }

        Ok(ScanOutcome {
            entry_id: entry.id,
            fingerprint,
            from_cache: true,
            result,
            uploaded_filename: upload.filename,
            annotated_filename,
            warnings,
        })
    }

    async fn try_annotate(
        &self,
        buffer: &[u8],
        upload_filename: &str,
        result: &DocumentResult,
        warnings: &mut Vec<String>,
    ) -> Option<String> {
        let drawn = match draw_detection_boxes(buffer, &result.detections) {
            Ok(drawn) => drawn,
            Err(e) => {
                warn!(error = %e, "Failed to draw detection boxes");
                warnings.push(format!("Annotation failed: {e}"));
                return None;
            }
        };
        match self
            .artifacts
            .save_processed(BOXED_PREFIX, upload_filename, &drawn)
            .await
        {
            Ok(artifact) => Some(artifact.filename),
            Err(e) => {
                warn!(error = %e, "Failed to store annotated artifact");
                warnings.push(format!("Annotated image not stored: {e}"));
                None
            }
        }
    }

    fn build_history_entry(
        &self,
        stored_filename: &str,
        original_filename: &str,
        fingerprint: &str,
        result: &DocumentResult,
    ) -> HistoryEntry {
        let artifact_path = self
            .artifacts
            .resolve(crate::storage::ArtifactKind::Uploads, stored_filename)
            .map(|p| p.display().to_string())
            .unwrap_or_default();

        HistoryEntry {
            id: nanoid!(),
            filename: stored_filename.to_string(),
            original_filename: original_filename.to_string(),
            text: result.text.clone(),
            confidence: result.stats.avg_confidence,
            word_count: result.stats.word_count,
            char_count: result.stats.char_count,
            created_at: Utc::now(),
            artifact_path,
            content_fingerprint: fingerprint.to_string(),
        }
    }
}
