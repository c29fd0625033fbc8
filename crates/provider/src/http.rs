//! HTTP implementation of [`ImageProvider`] using [`reqwest`].

use async_trait::async_trait;
use serde::Serialize;

use crate::config::ProviderConfig;
use crate::error::ProviderError;
use crate::response::ProviderImageResponse;
use crate::{EditRequest, GenerateRequest, ImageProvider};

/// Path of the text-to-image endpoint.
const GENERATIONS_PATH: &str = "/images/generations";
/// Path of the image edit endpoint.
const EDITS_PATH: &str = "/images/edits";

/// Generation requests always ask for hosted URLs.
#[derive(Serialize)]
struct GenerationPayload<'a> {
    #[serde(flatten)]
    request: &'a GenerateRequest,
    response_format: &'static str,
}

/// Client for the provider's JSON API.
pub struct HttpImageProvider {
    client: reqwest::Client,
    config: ProviderConfig,
}

impl HttpImageProvider {
    /// Create a provider whose requests are bounded by `config.timeout`.
    pub fn new(config: ProviderConfig) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    async fn post<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<Vec<String>, ProviderError> {
        let url = format!("{}{}", self.config.base_url, path);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| self.classify(e))?;
        if !status.is_success() {
            tracing::warn!(%url, status = status.as_u16(), "Provider returned an error status");
            return Err(ProviderError::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: ProviderImageResponse = serde_json::from_str(&text)?;
        let references = parsed.into_references();
        tracing::debug!(%url, results = references.len(), "Provider call succeeded");
        Ok(references)
    }

    fn classify(&self, err: reqwest::Error) -> ProviderError {
        if err.is_timeout() {
            ProviderError::Timeout(self.config.timeout)
        } else {
            ProviderError::Request(err)
        }
    }
}

#[async_trait]
impl ImageProvider for HttpImageProvider {
    async fn generate(&self, request: &GenerateRequest) -> Result<Vec<String>, ProviderError> {
        let payload = GenerationPayload {
            request,
            response_format: "url",
        };
        self.post(GENERATIONS_PATH, &payload).await
    }

    async fn edit(&self, request: &EditRequest) -> Result<Vec<String>, ProviderError> {
        self.post(EDITS_PATH, request).await
    }
}
