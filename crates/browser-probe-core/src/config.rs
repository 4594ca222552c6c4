//! Configuration, read from the environment at startup.

use std::time::Duration;

use crate::error::{ProbeError, Result};

/// Environment variable naming the remote browser's WebSocket endpoint.
pub const ENDPOINT_ENV: &str = "BROWSER_WS_ENDPOINT_PRIVATE";

/// Environment variable overriding the HTTP listen port.
pub const PORT_ENV: &str = "PORT";

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_TARGET_URL: &str = "https://example.com";
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);
pub const NAVIGATE_TIMEOUT: Duration = Duration::from_secs(30);

/// Runtime configuration for the probe service.
#[derive(Debug, Clone)]
pub struct Config {
    /// WebSocket URL of the remote browser backend. A run fails fast when
    /// this is absent; the HTTP server still starts.
    pub ws_endpoint: Option<String>,
    /// HTTP listen port.
    pub port: u16,
    /// URL the connectivity test navigates to.
    pub target_url: String,
    /// Bound on the backend connect call.
    pub connect_timeout: Duration,
    /// Bound on the navigation call.
    pub navigate_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ws_endpoint: None,
            port: DEFAULT_PORT,
            target_url: DEFAULT_TARGET_URL.to_string(),
            connect_timeout: CONNECT_TIMEOUT,
            navigate_timeout: NAVIGATE_TIMEOUT,
        }
    }
}

impl Config {
    /// Build a config from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup. Empty values count
    /// as unset; an unparseable port falls back to the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let ws_endpoint = lookup(ENDPOINT_ENV).filter(|v| !v.is_empty());
        let port = lookup(PORT_ENV)
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        Self {
            ws_endpoint,
            port,
            ..Self::default()
        }
    }

    /// The configured endpoint, or a config error naming the variable.
    pub fn require_endpoint(&self) -> Result<&str> {
        self.ws_endpoint
            .as_deref()
            .ok_or_else(|| ProbeError::Config(format!("{ENDPOINT_ENV} environment variable is not set")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = Config::from_lookup(|_| None);
        assert!(config.ws_endpoint.is_none());
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.target_url, DEFAULT_TARGET_URL);
        assert!(config.require_endpoint().is_err());
    }

    #[test]
    fn test_endpoint_and_port_from_env() {
        let config = Config::from_lookup(|key| match key {
            ENDPOINT_ENV => Some("ws://browser:3000?token=abc".to_string()),
            PORT_ENV => Some("8080".to_string()),
            _ => None,
        });
        assert_eq!(config.require_endpoint().unwrap(), "ws://browser:3000?token=abc");
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_empty_endpoint_counts_as_unset() {
        let config = Config::from_lookup(|key| (key == ENDPOINT_ENV).then(String::new));
        assert!(config.ws_endpoint.is_none());
    }

    #[test]
    fn test_bad_port_falls_back() {
        let config = Config::from_lookup(|key| (key == PORT_ENV).then(|| "not-a-port".to_string()));
        assert_eq!(config.port, DEFAULT_PORT);
    }
}
