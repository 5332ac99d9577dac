use serde::Deserialize;
use std::env;

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub engine: EngineConfig,
    pub enhance: EnhanceConfig,
    pub reconstruct: ReconstructConfig,
    pub retention: RetentionConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub api_keys: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub auth_token: Option<String>,
    pub local_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub upload_dir: String,
    pub processed_dir: String,
    pub max_upload_bytes: usize,
}

/// Recognition engine endpoint configuration. The engine is an external
/// HTTP collaborator; when `base_url` is unset the provider starts in an
/// unavailable state and scan requests fail with a typed error.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub profile: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnhanceConfig {
    pub max_width: u32,
    pub contrast: f32,
    pub sharpen: f32,
    pub denoise: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReconstructConfig {
    pub line_threshold: f32,
    pub min_confidence: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RetentionConfig {
    pub max_age_secs: u64,
    pub sweep_interval_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: env::var("LECTOR_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or("LECTOR_PORT", 3000),
                api_keys: env::var("LECTOR_API_KEYS")
                    .map(|keys| keys.split(',').map(|s| s.trim().to_string()).collect())
                    .unwrap_or_default(),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").unwrap_or_else(|_| "file:lector.db".to_string()),
                auth_token: env::var("DATABASE_AUTH_TOKEN").ok(),
                local_path: env::var("DATABASE_LOCAL_PATH").ok(),
            },
            storage: StorageConfig {
                upload_dir: env::var("STORAGE_UPLOAD_DIR")
                    .unwrap_or_else(|_| "uploads".to_string()),
                processed_dir: env::var("STORAGE_PROCESSED_DIR")
                    .unwrap_or_else(|_| "processed".to_string()),
                max_upload_bytes: parse_env_or("STORAGE_MAX_UPLOAD_BYTES", 25 * 1024 * 1024),
            },
            engine: EngineConfig {
                base_url: env::var("ENGINE_BASE_URL").ok(),
                api_key: env::var("ENGINE_API_KEY").ok(),
                timeout_secs: parse_env_or("ENGINE_TIMEOUT", 60),
                profile: env::var("ENGINE_PROFILE").unwrap_or_else(|_| "accurate".to_string()),
            },
            enhance: EnhanceConfig {
                max_width: parse_env_or("ENHANCE_MAX_WIDTH", 2000),
                contrast: parse_env_or("ENHANCE_CONTRAST", 1.3),
                sharpen: parse_env_or("ENHANCE_SHARPEN", 1.5),
                denoise: parse_env_or("ENHANCE_DENOISE", true),
            },
            reconstruct: ReconstructConfig {
                line_threshold: parse_env_or("RECONSTRUCT_LINE_THRESHOLD", 15.0),
                min_confidence: parse_env_or("RECONSTRUCT_MIN_CONFIDENCE", 0.3),
            },
            retention: RetentionConfig {
                max_age_secs: parse_env_or("RETENTION_MAX_AGE_SECS", 86400),
                sweep_interval_secs: parse_env_or("RETENTION_SWEEP_INTERVAL_SECS", 3600),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }
}
