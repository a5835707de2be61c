//! Server configuration
//!
//! Credentials and connection settings for the vigilance platform API.
//! A `Config` is built once at startup and shared read-only afterwards;
//! nothing mutates it while the server is running.

/// Default base URL of the vigilance platform REST API
pub const DEFAULT_BASE_URL: &str = "https://app.vigilia.fr/api/v1";

/// Default per-request timeout in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Configuration error raised at startup
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("VIGILIA_API_KEY is not set; the server cannot reach the vigilance platform without it")]
    MissingApiKey,
    #[error("API base URL must start with http:// or https://, got {0:?}")]
    InvalidBaseUrl(String),
    #[error("VIGILIA_TIMEOUT_MS must be a positive integer, got {0:?}")]
    InvalidTimeout(String),
}

/// Immutable server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Bearer credential for the vigilance platform
    pub api_key: String,
    /// Base URL without trailing slash
    pub base_url: String,
    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Config {
    /// Build a config, normalizing the base URL and rejecting empty credentials.
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout_ms: u64,
    ) -> Result<Self, ConfigError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }

        let base_url = base_url.into();
        let base_url = base_url.trim_end_matches('/').to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::InvalidBaseUrl(base_url));
        }

        if timeout_ms == 0 {
            return Err(ConfigError::InvalidTimeout(timeout_ms.to_string()));
        }

        Ok(Self {
            api_key,
            base_url,
            timeout_ms,
        })
    }

    /// Create config from environment variables
    ///
    /// `VIGILIA_API_KEY` is mandatory. `VIGILIA_API_URL` and
    /// `VIGILIA_TIMEOUT_MS` fall back to the documented defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("VIGILIA_API_KEY").map_err(|_| ConfigError::MissingApiKey)?;
        let base_url =
            std::env::var("VIGILIA_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let timeout_ms = match std::env::var("VIGILIA_TIMEOUT_MS") {
            Ok(raw) => raw
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidTimeout(raw))?,
            Err(_) => DEFAULT_TIMEOUT_MS,
        };

        Self::new(api_key, base_url, timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let config = Config::new("sk-test", "https://api.example.com/v1/", 30_000).unwrap();
        assert_eq!(config.base_url, "https://api.example.com/v1");
    }

    #[test]
    fn empty_key_is_rejected() {
        let err = Config::new("  ", DEFAULT_BASE_URL, 30_000).unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey));
    }

    #[test]
    fn non_http_url_is_rejected() {
        let err = Config::new("sk-test", "ftp://api.example.com", 30_000).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBaseUrl(_)));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = Config::new("sk-test", DEFAULT_BASE_URL, 0).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTimeout(_)));
    }
}
