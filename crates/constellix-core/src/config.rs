//! Configuration types for the Constellix resource adapters
//!
//! This module defines the configuration structures shared by the client
//! crate and the `constellixctl` binary.

use serde::{Deserialize, Serialize};

/// Default Constellix REST endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.dns.constellix.com";

/// API client configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Constellix API key
    pub api_key: String,

    /// Constellix secret key used to sign requests
    pub secret_key: String,

    /// Base URL the versioned `v1/...` paths are joined onto
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout (in seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Send lookups but only log writes
    #[serde(default)]
    pub dry_run: bool,
}

// Keys stay out of logs
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<REDACTED>")
            .field("secret_key", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl ClientConfig {
    /// Create a configuration with default endpoint and timeout
    pub fn new(api_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            secret_key: secret_key.into(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            dry_run: false,
        }
    }

    /// Override the base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the request timeout
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Enable or disable dry-run mode
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.api_key.is_empty() {
            return Err(crate::Error::config("Constellix API key cannot be empty"));
        }
        if self.secret_key.is_empty() {
            return Err(crate::Error::config("Constellix secret key cannot be empty"));
        }
        if !self.base_url.starts_with("https://") && !self.base_url.starts_with("http://") {
            return Err(crate::Error::config(format!(
                "Base URL must use HTTP or HTTPS scheme. Got: {}",
                self.base_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(crate::Error::config("Request timeout must be > 0"));
        }
        Ok(())
    }

    /// Join a versioned API path onto the base URL
    pub fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_applied_on_deserialize() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"api_key": "k", "secret_key": "s"}"#).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, 30);
        assert!(!config.dry_run);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_credentials_are_rejected() {
        assert!(ClientConfig::new("", "secret").validate().is_err());
        assert!(ClientConfig::new("key", "").validate().is_err());
    }

    #[test]
    fn bad_scheme_and_zero_timeout_are_rejected() {
        let config = ClientConfig::new("key", "secret").with_base_url("ftp://example.com");
        assert!(config.validate().is_err());

        let config = ClientConfig::new("key", "secret").with_timeout_secs(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn url_for_joins_without_double_slashes() {
        let config = ClientConfig::new("key", "secret").with_base_url("http://localhost:8080/");
        assert_eq!(
            config.url_for("/v1/pools/A/42"),
            "http://localhost:8080/v1/pools/A/42"
        );
        assert_eq!(
            config.url_for("v1/domains/1/records/mx"),
            "http://localhost:8080/v1/domains/1/records/mx"
        );
    }

    #[test]
    fn debug_hides_credentials() {
        let config = ClientConfig::new("api-key-123", "secret-456");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("api-key-123"));
        assert!(!debug.contains("secret-456"));
    }
}
