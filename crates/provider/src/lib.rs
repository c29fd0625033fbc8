//! Client for the external image-generation provider.
//!
//! [`ImageProvider`] is the seam the generation pipeline calls through;
//! [`http::HttpImageProvider`] is the production implementation speaking the
//! provider's JSON-over-HTTP API. Response reshaping (alternate result field
//! names, base64 payloads) lives in [`response`].

pub mod config;
pub mod error;
pub mod http;
pub mod response;

use async_trait::async_trait;
use serde::Serialize;

pub use config::ProviderConfig;
pub use error::ProviderError;
pub use http::HttpImageProvider;

/// Parameters for a text-to-image request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    pub size: String,
    pub n: u32,
}

/// Parameters for an image edit (image + prompt, optional mask).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditRequest {
    pub model: String,
    /// Source image, as a URL or data URL.
    pub image: String,
    pub prompt: String,
    pub size: String,
    pub n: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mask: Option<String>,
}

/// An image-generation backend.
///
/// Both calls return one string per usable result: either a hosted URL or a
/// `data:image/png;base64,...` URL.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    async fn generate(&self, request: &GenerateRequest) -> Result<Vec<String>, ProviderError>;

    async fn edit(&self, request: &EditRequest) -> Result<Vec<String>, ProviderError>;
}
