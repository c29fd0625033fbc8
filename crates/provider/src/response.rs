//! Provider response shapes and reshaping into result strings.
//!
//! The provider puts its results under `images` on some models and under
//! `data` on others. `images` wins when it is non-empty. Each result carries
//! a hosted `url` or an inline `b64_json` payload; payloads are wrapped into
//! PNG data URLs.

use atelier_core::data_url::to_png_data_url;
use serde::Deserialize;

/// One generated result.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ProviderImage {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub b64_json: Option<String>,
}

/// Body returned by the generation and edit endpoints.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ProviderImageResponse {
    #[serde(default)]
    pub images: Option<Vec<ProviderImage>>,
    #[serde(default)]
    pub data: Option<Vec<ProviderImage>>,
    #[serde(default)]
    pub created: Option<i64>,
    #[serde(default)]
    pub model: Option<String>,
}

impl ProviderImage {
    /// The URL if present, otherwise the payload as a data URL.
    pub fn reference(&self) -> Option<String> {
        match (non_empty(&self.url), non_empty(&self.b64_json)) {
            (Some(url), _) => Some(url.to_string()),
            (None, Some(b64)) => Some(to_png_data_url(b64)),
            (None, None) => None,
        }
    }
}

impl ProviderImageResponse {
    /// The results array: `images` if non-empty, else `data`.
    pub fn results(&self) -> &[ProviderImage] {
        match self.images.as_deref() {
            Some(images) if !images.is_empty() => images,
            _ => self.data.as_deref().unwrap_or_default(),
        }
    }

    /// One reference string per usable result, in provider order.
    pub fn into_references(self) -> Vec<String> {
        self.results()
            .iter()
            .filter_map(ProviderImage::reference)
            .collect()
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
