use std::time::Duration;

/// Default provider endpoint.
const DEFAULT_BASE_URL: &str = "https://api.qnaigc.com/v1";
/// Default upper bound for a single provider call, in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Connection settings for the image-generation provider.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Base URL without trailing slash, e.g. `https://host/v1`.
    pub base_url: String,
    /// Bearer credential sent with every request.
    pub api_key: String,
    /// Upper bound for one provider call; expiry counts as a failure.
    pub timeout: Duration,
}

impl ProviderConfig {
    /// Load provider configuration from environment variables.
    ///
    /// | Env Var                  | Default                     |
    /// |--------------------------|-----------------------------|
    /// | `IMAGE_API_BASE_URL`     | `https://api.qnaigc.com/v1` |
    /// | `IMAGE_API_KEY`          | empty                       |
    /// | `IMAGE_API_TIMEOUT_SECS` | `60`                        |
    pub fn from_env() -> Self {
        let base_url = std::env::var("IMAGE_API_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.into())
            .trim_end_matches('/')
            .to_string();

        let api_key = std::env::var("IMAGE_API_KEY").unwrap_or_default();

        let timeout_secs: u64 = std::env::var("IMAGE_API_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
            .parse()
            .expect("IMAGE_API_TIMEOUT_SECS must be a valid u64");

        Self {
            base_url,
            api_key,
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}
