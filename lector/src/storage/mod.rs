//! Artifact storage.
//!
//! Two directories hold image artifacts: raw uploads and processed
//! outputs. Stored names are collision-free (`<epoch>_<uuid>.<ext>`);
//! processed variants reuse the upload's stored name behind a `pre_`
//! (enhanced) or `boxed_` (annotated) prefix. The retention sweeper
//! deletes files from both directories by age, so any reader of these
//! paths must treat a missing file as routine.

use std::path::{Path, PathBuf};

use chrono::Utc;
use uuid::Uuid;

use crate::config::StorageConfig;
use crate::error::{LectorError, Result};

/// Upload extensions accepted for scanning. Anything else is rejected
/// before any artifact is written.
pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "tiff", "webp"];

/// Prefix for enhanced (pre-recognition) artifacts.
pub const PRE_PREFIX: &str = "pre_";
/// Prefix for box-annotated artifacts.
pub const BOXED_PREFIX: &str = "boxed_";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Uploads,
    Processed,
}

impl std::str::FromStr for ArtifactKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "uploads" => Ok(Self::Uploads),
            "processed" => Ok(Self::Processed),
            other => Err(format!("unknown artifact kind '{other}'")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StoredArtifact {
    pub filename: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ArtifactStore {
    uploads_dir: PathBuf,
    processed_dir: PathBuf,
}

impl ArtifactStore {
    pub async fn new(config: &StorageConfig) -> Result<Self> {
        let uploads_dir = PathBuf::from(&config.upload_dir);
        let processed_dir = PathBuf::from(&config.processed_dir);

        tokio::fs::create_dir_all(&uploads_dir)
            .await
            .map_err(|e| LectorError::Storage(format!("Failed to create upload dir: {e}")))?;
        tokio::fs::create_dir_all(&processed_dir)
            .await
            .map_err(|e| LectorError::Storage(format!("Failed to create processed dir: {e}")))?;

        Ok(Self {
            uploads_dir,
            processed_dir,
        })
    }

    /// The directories the retention sweeper scans.
    pub fn dirs(&self) -> Vec<PathBuf> {
        vec![self.uploads_dir.clone(), self.processed_dir.clone()]
    }

    /// Lowercased extension of `filename` if it is an accepted upload
    /// type.
    pub fn allowed_extension(filename: &str) -> Option<String> {
        let ext = Path::new(filename).extension()?.to_str()?.to_lowercase();
        ALLOWED_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
    }

    /// Store a raw upload under a collision-free name. The original
    /// filename contributes only its extension; everything else the
    /// client sent is untrusted display metadata.
    pub async fn save_upload(&self, original_filename: &str, bytes: &[u8]) -> Result<StoredArtifact> {
        let ext = Self::allowed_extension(original_filename).ok_or_else(|| {
            LectorError::InvalidInput(format!("Unsupported file type: {original_filename}"))
        })?;

        let filename = format!("{}_{}.{}", Utc::now().timestamp(), Uuid::new_v4().simple(), ext);
        let path = self.uploads_dir.join(&filename);

        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| LectorError::Storage(format!("Failed to store upload: {e}")))?;

        Ok(StoredArtifact { filename, path })
    }

    /// Store a processed variant of an already-stored upload. The
    /// processed buffer is PNG regardless of the upload's extension.
    pub async fn save_processed(
        &self,
        prefix: &str,
        upload_filename: &str,
        bytes: &[u8],
    ) -> Result<StoredArtifact> {
        let stem = Path::new(upload_filename)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(upload_filename);
        let filename = format!("{prefix}{stem}.png");
        let path = self.processed_dir.join(&filename);

        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| LectorError::Storage(format!("Failed to store processed image: {e}")))?;

        Ok(StoredArtifact { filename, path })
    }

    /// Resolve a stored filename back to its path. Names containing path
    /// separators or parent components are rejected outright.
    pub fn resolve(&self, kind: ArtifactKind, filename: &str) -> Result<PathBuf> {
        if filename.is_empty()
            || filename.contains('/')
            || filename.contains('\\')
            || filename.contains("..")
        {
            return Err(LectorError::InvalidInput(format!(
                "Invalid artifact name: {filename}"
            )));
        }

        let dir = match kind {
            ArtifactKind::Uploads => &self.uploads_dir,
            ArtifactKind::Processed => &self.processed_dir,
        };
        Ok(dir.join(filename))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_store() -> (ArtifactStore, tempfile::TempDir) {
        let tmp = tempfile::tempdir().unwrap();
        let config = StorageConfig {
            upload_dir: tmp.path().join("uploads").to_str().unwrap().to_string(),
            processed_dir: tmp.path().join("processed").to_str().unwrap().to_string(),
            max_upload_bytes: 1024 * 1024,
        };
        (ArtifactStore::new(&config).await.unwrap(), tmp)
    }

    #[test]
    fn allowed_extension_accepts_known_types_case_insensitively() {
        assert_eq!(ArtifactStore::allowed_extension("scan.PNG"), Some("png".into()));
        assert_eq!(ArtifactStore::allowed_extension("a.b.jpeg"), Some("jpeg".into()));
        assert_eq!(ArtifactStore::allowed_extension("doc.pdf"), None);
        assert_eq!(ArtifactStore::allowed_extension("noext"), None);
    }

    #[tokio::test]
    async fn save_upload_generates_unique_names() {
        let (store, _tmp) = test_store().await;
        let a = store.save_upload("scan.png", b"one").await.unwrap();
        let b = store.save_upload("scan.png", b"two").await.unwrap();
        assert_ne!(a.filename, b.filename);
        assert!(a.path.exists());
        assert!(b.path.exists());
        assert!(a.filename.ends_with(".png"));
    }

    #[tokio::test]
    async fn save_upload_rejects_unsupported_type() {
        let (store, _tmp) = test_store().await;
        let err = store.save_upload("script.sh", b"#!/bin/sh").await.unwrap_err();
        assert!(matches!(err, LectorError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn save_processed_prefixes_the_upload_stem() {
        let (store, _tmp) = test_store().await;
        let upload = store.save_upload("scan.jpg", b"raw").await.unwrap();
        let boxed = store
            .save_processed(BOXED_PREFIX, &upload.filename, b"annotated")
            .await
            .unwrap();
        assert!(boxed.filename.starts_with("boxed_"));
        assert!(boxed.filename.ends_with(".png"));
        assert!(boxed.path.exists());
    }

    #[tokio::test]
    async fn resolve_rejects_path_traversal() {
        let (store, _tmp) = test_store().await;
        assert!(store.resolve(ArtifactKind::Uploads, "../etc/passwd").is_err());
        assert!(store.resolve(ArtifactKind::Uploads, "a/b.png").is_err());
        assert!(store.resolve(ArtifactKind::Uploads, "").is_err());
        assert!(store.resolve(ArtifactKind::Processed, "boxed_a.png").is_ok());
    }
}
