#![allow(dead_code)]

use std::path::{Path, PathBuf};

use lector::config::{
    Config, DatabaseConfig, EngineConfig, EnhanceConfig, ReconstructConfig, RetentionConfig,
    ServerConfig, StorageConfig,
};
use lector::db::Database;
use lector::engine::EngineProvider;
use lector::services::{HistoryLog, ResultCache, ScanService};
use lector::storage::ArtifactStore;

/// A flat test PNG. Vary `shade` to get byte-distinct images.
pub fn test_png(width: u32, height: u32, shade: u8) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([shade, shade, shade]));
    let mut out = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut std::io::Cursor::new(&mut out), image::ImageFormat::Png)
        .unwrap();
    out
}

/// One engine wire detection for wiremock response bodies.
pub fn engine_detection(x: f32, top_y: f32, text: &str, confidence: f32) -> serde_json::Value {
    serde_json::json!({
        "polygon": [
            [x, top_y],
            [x + 40.0, top_y],
            [x + 40.0, top_y + 20.0],
            [x, top_y + 20.0]
        ],
        "text": text,
        "confidence": confidence
    })
}

pub fn test_config(tmp: &Path, engine_base_url: Option<String>) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
            api_keys: vec![],
        },
        database: DatabaseConfig {
            url: format!("file:{}", tmp.join("lector.db").display()),
            auth_token: None,
            local_path: None,
        },
        storage: StorageConfig {
            upload_dir: tmp.join("uploads").to_str().unwrap().to_string(),
            processed_dir: tmp.join("processed").to_str().unwrap().to_string(),
            max_upload_bytes: 10 * 1024 * 1024,
        },
        engine: EngineConfig {
            base_url: engine_base_url,
            api_key: None,
            timeout_secs: 5,
            profile: "accurate".to_string(),
        },
        enhance: EnhanceConfig {
            max_width: 2000,
            contrast: 1.3,
            sharpen: 1.5,
            denoise: true,
        },
        reconstruct: ReconstructConfig {
            line_threshold: 15.0,
            min_confidence: 0.3,
        },
        retention: RetentionConfig {
            max_age_secs: 86400,
            sweep_interval_secs: 3600,
        },
    }
}

/// Everything a service-level test needs, built over an in-memory
/// database and temp artifact directories.
pub struct TestContext {
    pub config: Config,
    pub db: Database,
    pub cache: ResultCache,
    pub history: HistoryLog,
    pub scans: ScanService,
    pub uploads_dir: PathBuf,
    pub processed_dir: PathBuf,
}

pub async fn test_context(tmp: &Path, engine_base_url: Option<String>) -> TestContext {
    let config = test_config(tmp, engine_base_url);
    let db = Database::new(&config.database).await.unwrap();
    let engine = EngineProvider::new(&config.engine);
    let artifacts = ArtifactStore::new(&config.storage).await.unwrap();

    let cache = ResultCache::new(db.clone());
    let history = HistoryLog::new(db.clone());
    let scans = ScanService::new(
        engine,
        cache.clone(),
        history.clone(),
        artifacts,
        &config,
    );

    TestContext {
        uploads_dir: PathBuf::from(&config.storage.upload_dir),
        processed_dir: PathBuf::from(&config.storage.processed_dir),
        config,
        db,
        cache,
        history,
        scans,
    }
}

/// Names of regular files in a directory.
pub fn dir_filenames(dir: &Path) -> Vec<String> {
    match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect(),
        Err(_) => Vec::new(),
    }
}
