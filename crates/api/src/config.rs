use std::time::Duration;

use atelier_core::generation::DEFAULT_MIN_REQUEST_INTERVAL;
use atelier_provider::ProviderConfig;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8080`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `300`). Must cover a whole
    /// paced batch, not just one provider call.
    pub request_timeout_secs: u64,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Image provider endpoint and credential.
    pub provider: ProviderConfig,
    /// Pause between consecutive prompts of a batch.
    pub generation_interval: Duration,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default                                       |
    /// |------------------------------|-----------------------------------------------|
    /// | `HOST`                       | `0.0.0.0`                                     |
    /// | `PORT`                       | `8080`                                        |
    /// | `CORS_ORIGINS`               | `http://localhost:5173,http://localhost:3000` |
    /// | `REQUEST_TIMEOUT_SECS`       | `300`                                         |
    /// | `GENERATION_MIN_INTERVAL_MS` | `1000`                                        |
    ///
    /// JWT and provider settings are read by [`JwtConfig::from_env`] and
    /// [`ProviderConfig::from_env`].
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173,http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "300".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let generation_interval = std::env::var("GENERATION_MIN_INTERVAL_MS")
            .ok()
            .map(|v| {
                v.parse::<u64>()
                    .expect("GENERATION_MIN_INTERVAL_MS must be a valid u64")
            })
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_MIN_REQUEST_INTERVAL);

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt: JwtConfig::from_env(),
            provider: ProviderConfig::from_env(),
            generation_interval,
        }
    }
}
