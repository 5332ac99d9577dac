use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::EngineConfig;
use crate::error::{LectorError, Result};
use crate::models::{Detection, Point};

use super::profile::EngineProfile;

#[derive(Clone, Debug)]
pub struct RemoteEngineClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Debug, Serialize)]
struct RecognizeRequest<'a> {
    image: String,
    params: &'a EngineProfile,
}

#[derive(Debug, Deserialize)]
struct RecognizeResponse {
    detections: Vec<WireDetection>,
}

#[derive(Debug, Deserialize)]
struct WireDetection {
    polygon: [[f32; 2]; 4],
    text: String,
    confidence: f32,
}

impl From<WireDetection> for Detection {
    fn from(wire: WireDetection) -> Self {
        let polygon: [Point; 4] = [
            wire.polygon[0].into(),
            wire.polygon[1].into(),
            wire.polygon[2].into(),
            wire.polygon[3].into(),
        ];
        Detection::new(polygon, wire.text, wire.confidence)
    }
}

impl RemoteEngineClient {
    pub fn new(config: &EngineConfig) -> Result<Self> {
        let base_url = config
            .base_url
            .clone()
            .ok_or_else(|| LectorError::Engine("ENGINE_BASE_URL is not set".to_string()))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LectorError::Engine(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    pub async fn recognize(
        &self,
        image_bytes: &[u8],
        profile: &EngineProfile,
    ) -> Result<Vec<Detection>> {
        let request = RecognizeRequest {
            image: STANDARD.encode(image_bytes),
            params: profile,
        };

        let mut retries: u64 = 0;
        let max_retries: u64 = 3;

        loop {
            let mut builder = self
                .client
                .post(format!("{}/recognize", self.base_url))
                .header("Content-Type", "application/json")
                .json(&request);
            if let Some(ref key) = self.api_key {
                builder = builder.header("Authorization", format!("Bearer {key}"));
            }

            let response = builder.send().await;

            match response {
                Ok(resp) => {
                    if resp.status().is_success() {
                        let recognized: RecognizeResponse = resp.json().await.map_err(|e| {
                            LectorError::Engine(format!("Failed to parse engine response: {e}"))
                        })?;
                        return Ok(recognized
                            .detections
                            .into_iter()
                            .map(Detection::from)
                            .collect());
                    } else if resp.status().as_u16() == 429 || resp.status().is_server_error() {
                        retries += 1;
                        if retries >= max_retries {
                            return Err(LectorError::Engine(format!(
                                "Engine request failed after {} retries: {}",
                                max_retries,
                                resp.status()
                            )));
                        }
                        tokio::time::sleep(Duration::from_millis(500 * retries)).await;
                    } else {
                        // 4xx other than 429: the engine rejected this
                        // image, a typed failure rather than a retry case.
                        let status = resp.status();
                        let body = resp.text().await.unwrap_or_default();
                        return Err(LectorError::Engine(format!(
                            "Engine rejected request ({status}): {body}"
                        )));
                    }
                }
                Err(e) => {
                    retries += 1;
                    if retries >= max_retries {
                        return Err(LectorError::Engine(format!(
                            "Engine request failed after {max_retries} retries: {e}"
                        )));
                    }
                    tokio::time::sleep(Duration::from_millis(500 * retries)).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> EngineConfig {
        EngineConfig {
            base_url: Some(server.uri()),
            api_key: None,
            timeout_secs: 5,
            profile: "accurate".to_string(),
        }
    }

    #[test]
    fn new_without_base_url_is_an_error() {
        let config = EngineConfig {
            base_url: None,
            api_key: None,
            timeout_secs: 5,
            profile: "accurate".to_string(),
        };
        assert!(RemoteEngineClient::new(&config).is_err());
    }

    #[tokio::test]
    async fn recognize_decodes_detections() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/recognize"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "detections": [
                    {
                        "polygon": [[0.0, 0.0], [40.0, 0.0], [40.0, 20.0], [0.0, 20.0]],
                        "text": "hello",
                        "confidence": 0.93
                    }
                ]
            })))
            .mount(&server)
            .await;

        let client = RemoteEngineClient::new(&config_for(&server)).unwrap();
        let detections = client
            .recognize(b"png-bytes", &EngineProfile::accurate())
            .await
            .unwrap();

        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].text, "hello");
        assert_eq!(detections[0].confidence, 0.93);
        assert_eq!(detections[0].top_y(), 0.0);
    }

    #[tokio::test]
    async fn recognize_surfaces_client_errors_without_retry() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/recognize"))
            .respond_with(ResponseTemplate::new(422).set_body_string("undecodable image"))
            .expect(1)
            .mount(&server)
            .await;

        let client = RemoteEngineClient::new(&config_for(&server)).unwrap();
        let err = client
            .recognize(b"not-an-image", &EngineProfile::quick())
            .await
            .unwrap_err();
        assert!(matches!(err, LectorError::Engine(_)));
    }

    #[tokio::test]
    async fn recognize_gives_up_after_bounded_retries_on_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/recognize"))
            .respond_with(ResponseTemplate::new(500))
            .expect(3)
            .mount(&server)
            .await;

        let client = RemoteEngineClient::new(&config_for(&server)).unwrap();
        let err = client
            .recognize(b"png-bytes", &EngineProfile::accurate())
            .await
            .unwrap_err();
        assert!(matches!(err, LectorError::Engine(_)));
    }
}
