pub mod error;

pub use error::{Result, VeoError};

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

const VEO_API_URL: &str = "https://api.veo.example.com/v1";

#[derive(Debug, Clone, Serialize)]
struct GenerationRequest<'a> {
    prompt: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
struct GenerationResponse {
    url: String,
}

/// Client for the video generation backend. Without an API key it runs in
/// mock mode and returns a deterministic URL derived from the prompt, so
/// the rest of the workflow can be exercised end-to-end.
pub struct VeoClient {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl VeoClient {
    pub fn new(api_key: Option<String>) -> Self {
        if api_key.is_none() {
            info!("No VEO API key configured, video generation will use mock mode");
        }
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: VEO_API_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn is_mock(&self) -> bool {
        self.api_key.is_none()
    }

    /// Generate a video from a text prompt and return its URL.
    // TODO: replace the placeholder endpoint once VEO API access is granted.
    pub async fn generate_video(&self, prompt: &str) -> Result<String> {
        let Some(key) = &self.api_key else {
            let url = mock_url(prompt);
            info!(url = %url, "Mock video generated");
            return Ok(url);
        };

        let endpoint = format!("{}/generations", self.base_url);
        let resp = self
            .client
            .post(&endpoint)
            .bearer_auth(key)
            .json(&GenerationRequest { prompt })
            .timeout(Duration::from_secs(10))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(VeoError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: GenerationResponse = resp.json().await?;
        info!(url = %body.url, "Video generated");
        Ok(body.url)
    }
}

fn mock_url(prompt: &str) -> String {
    let mut hasher = DefaultHasher::new();
    prompt.hash(&mut hasher);
    format!("https://example.com/videos/mock_{:016x}.mp4", hasher.finish())
}
