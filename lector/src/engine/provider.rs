use std::time::Duration;

use tracing::{info, warn};

use crate::config::EngineConfig;
use crate::error::{LectorError, Result};
use crate::models::Detection;

use super::api::RemoteEngineClient;
use super::profile::{EngineProfile, EngineProfileKind};

#[derive(Clone)]
enum EngineBackend {
    Remote { client: RemoteEngineClient },
    Unavailable { reason: String },
}

/// Process-wide recognition engine handle. Constructed once at startup and
/// shared by clone; the underlying HTTP client is connection-pooled and
/// safe for concurrent use, so no serialization is needed here.
#[derive(Clone)]
pub struct EngineProvider {
    backend: EngineBackend,
    config: EngineConfig,
}

impl EngineProvider {
    pub fn new(config: &EngineConfig) -> Self {
        let backend = match RemoteEngineClient::new(config) {
            Ok(client) => {
                info!(
                    base_url = %config.base_url.as_deref().unwrap_or(""),
                    "Recognition engine backend initialized"
                );
                EngineBackend::Remote { client }
            }
            Err(e) => {
                let reason = format!("Recognition engine unavailable: {e}");
                warn!("{}", reason);
                EngineBackend::Unavailable { reason }
            }
        };

        Self {
            backend,
            config: config.clone(),
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self.backend, EngineBackend::Unavailable { .. })
    }

    /// The profile selected by configuration, used when a request does not
    /// override it. An unknown configured name falls back to accurate.
    pub fn default_profile_kind(&self) -> EngineProfileKind {
        match self.config.profile.parse() {
            Ok(kind) => kind,
            Err(e) => {
                warn!("{}. Using accurate profile.", e);
                EngineProfileKind::Accurate
            }
        }
    }

    /// Run text recognition on an image buffer, bounded by the configured
    /// timeout. A timeout is a recoverable typed error, not a hang.
    pub async fn recognize(
        &self,
        image_bytes: &[u8],
        profile: &EngineProfile,
    ) -> Result<Vec<Detection>> {
        let timeout = Duration::from_secs(self.config.timeout_secs);

        match tokio::time::timeout(timeout, self.recognize_internal(image_bytes, profile)).await {
            Ok(inner) => inner,
            Err(_) => Err(LectorError::EngineTimeout(self.config.timeout_secs)),
        }
    }

    async fn recognize_internal(
        &self,
        image_bytes: &[u8],
        profile: &EngineProfile,
    ) -> Result<Vec<Detection>> {
        match &self.backend {
            EngineBackend::Remote { client } => client.recognize(image_bytes, profile).await,
            EngineBackend::Unavailable { reason } => {
                Err(LectorError::EngineUnavailable(reason.clone()))
            }
        }
    }
}
