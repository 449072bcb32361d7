//! Grafana connection settings

use crate::error::{AnnotationError, AnnotationResult};
use std::time::Duration;

/// Environment variable holding the Grafana base URL
pub const GRAFANA_URL_ENV: &str = "SWXSOC_GRAFANA_URL";

/// Environment variable holding the Grafana API key
pub const GRAFANA_API_KEY_ENV: &str = "SWXSOC_GRAFANA_API_KEY";

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Where and how to reach Grafana
#[derive(Clone)]
pub struct GrafanaConfig {
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl GrafanaConfig {
    /// Settings from explicit values; a trailing `/` is dropped
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Settings from `SWXSOC_GRAFANA_URL` and `SWXSOC_GRAFANA_API_KEY`
    ///
    /// # Errors
    /// [`AnnotationError::MissingSetting`] if either variable is unset or empty.
    pub fn from_env() -> AnnotationResult<Self> {
        Ok(Self::new(
            require_env(GRAFANA_URL_ENV)?,
            require_env(GRAFANA_API_KEY_ENV)?,
        ))
    }

    /// Override the request timeout
    #[inline]
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Base URL without trailing slash
    #[inline]
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[inline]
    #[must_use]
    pub(crate) fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Request timeout
    #[inline]
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

// Keeps the key out of logs.
impl std::fmt::Debug for GrafanaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GrafanaConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn require_env(variable: &'static str) -> AnnotationResult<String> {
    std::env::var(variable)
        .ok()
        .filter(|value| !value.is_empty())
        .ok_or(AnnotationError::MissingSetting(variable))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_trailing_slash() {
        let config = GrafanaConfig::new("https://grafana.example.org/", "key");
        assert_eq!(config.base_url(), "https://grafana.example.org");
        assert_eq!(config.timeout(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn debug_hides_key() {
        let config = GrafanaConfig::new("https://grafana.example.org", "s3cret");
        let printed = format!("{config:?}");
        assert!(!printed.contains("s3cret"));
        assert!(printed.contains("grafana.example.org"));
    }
}
