//! Client Configuration
//!
//! Transport-level settings shared by every HTTP adapter.

use std::time::Duration;

/// Environment variable holding the REST API base URL
pub const BASE_URL_ENV: &str = "CONSOLE_API_BASE_URL";

const DEFAULT_BASE_URL: &str = "http://localhost:3000";
const DEFAULT_USER_AGENT: &str = concat!("support-console/", env!("CARGO_PKG_VERSION"));

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL without trailing slash
    pub base_url: String,
    /// Transport timeout applied by the HTTP client (30 seconds)
    pub request_timeout: Duration,
    /// User-Agent header sent on every request
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(30),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ClientConfig {
    /// Create config for development (local API server)
    pub fn development() -> Self {
        Self::default()
    }

    /// Create config from the environment, falling back to defaults
    pub fn from_env() -> Self {
        match std::env::var(BASE_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::default().with_base_url(url),
            _ => Self::default(),
        }
    }

    /// Override the base URL, normalizing a trailing slash away
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.base_url = url.trim().trim_end_matches('/').to_string();
        self
    }

    /// Join the base URL with an API path
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_url_join() {
        let config = ClientConfig::default().with_base_url("https://api.example.com/");
        assert_eq!(
            config.url("/api/auth/me"),
            "https://api.example.com/api/auth/me"
        );
        assert_eq!(config.url("api/faqs"), "https://api.example.com/api/faqs");
    }
}
