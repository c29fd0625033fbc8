use std::time::Duration;

/// Errors from the provider HTTP layer.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider did not answer within the configured timeout.
    #[error("Provider request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// The provider returned a non-2xx status code.
    #[error("API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The response body was not the expected JSON shape.
    #[error("Failed to parse provider response: {0}")]
    Decode(#[from] serde_json::Error),
}
