//! Client configuration from environment.

use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: String,
    pub debounce: Duration,
    pub http_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8080".to_string(),
            debounce: charimachi_core::DEFAULT_QUIET_PERIOD,
            http_timeout: Duration::from_secs(10),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_url: env::var("CHARIMACHI_API_URL").unwrap_or(defaults.api_url),
            debounce: env::var("CHARIMACHI_DEBOUNCE_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.debounce),
            http_timeout: env::var("CHARIMACHI_HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.http_timeout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_overrides_and_falls_back_on_garbage() {
        env::set_var("CHARIMACHI_API_URL", "http://routing.test:9000");
        env::set_var("CHARIMACHI_DEBOUNCE_MS", "2000");
        env::set_var("CHARIMACHI_HTTP_TIMEOUT_SECS", "soon");

        let config = ClientConfig::from_env();
        assert_eq!(config.api_url, "http://routing.test:9000");
        assert_eq!(config.debounce, Duration::from_millis(2000));
        assert_eq!(config.http_timeout, Duration::from_secs(10));

        env::remove_var("CHARIMACHI_API_URL");
        env::remove_var("CHARIMACHI_DEBOUNCE_MS");
        env::remove_var("CHARIMACHI_HTTP_TIMEOUT_SECS");

        let config = ClientConfig::from_env();
        assert_eq!(config.api_url, "http://localhost:8080");
        assert_eq!(config.debounce, Duration::from_millis(1000));
    }
}
