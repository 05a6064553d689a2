/// Configuration management for PromptLab
///
/// Handles server configuration and the upstream chat relay settings.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Upstream text-generation relay configuration
    pub relay: RelayConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server bind address (e.g., "0.0.0.0")
    pub host: String,
    /// Server port number
    pub port: u16,
    /// Attach a permissive CORS layer (browser dashboards call the API cross-origin)
    pub cors_permissive: bool,
}

/// Upstream provider configuration for the chat relay
///
/// The API key itself is never stored here: only the name of the environment
/// variable that holds it. The key is read on every call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// OpenAI-compatible base URL (e.g., "https://api.x.ai/v1")
    pub base_url: String,
    /// Upstream model name
    pub model: String,
    /// Environment variable holding the provider API key
    pub api_key_var: String,
    /// Whole-request timeout in seconds
    pub timeout_secs: u64,
    /// Connect timeout in seconds
    pub connect_timeout_secs: u64,
    /// Retries attempted before the response stream starts
    pub max_retries: u32,
    /// Base backoff between retries in milliseconds (doubled per attempt)
    pub retry_backoff_ms: u64,
}

impl RelayConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Backoff before retry number `attempt` (1-based)
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let factor = 1u64 << attempt.saturating_sub(1).min(16);
        Duration::from_millis(self.retry_backoff_ms.saturating_mul(factor))
    }

    /// Read the provider API key from the environment at call time
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_var)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            base_url: env_or("PROMPTLAB_RELAY_BASE_URL", "https://api.x.ai/v1"),
            model: env_or("PROMPTLAB_RELAY_MODEL", "grok-beta"),
            api_key_var: env_or("PROMPTLAB_RELAY_API_KEY_VAR", "XAI_API_KEY"),
            timeout_secs: env_parse("PROMPTLAB_RELAY_TIMEOUT_SECS", 60),
            connect_timeout_secs: env_parse("PROMPTLAB_RELAY_CONNECT_TIMEOUT_SECS", 10),
            max_retries: env_parse("PROMPTLAB_RELAY_MAX_RETRIES", 2),
            retry_backoff_ms: env_parse("PROMPTLAB_RELAY_RETRY_BACKOFF_MS", 250),
        }
    }
}

impl Default for Config {
    /// Default configuration with ENV_VAR support for k8s/container deployment
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: env_or("PROMPTLAB_HOST", "0.0.0.0"),
                port: env_parse("PROMPTLAB_PORT", 3004),
                cors_permissive: env_parse("PROMPTLAB_CORS_PERMISSIVE", true),
            },
            relay: RelayConfig::default(),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_per_attempt() {
        let relay = RelayConfig {
            retry_backoff_ms: 100,
            ..RelayConfig::default()
        };
        assert_eq!(relay.backoff_for(1), Duration::from_millis(100));
        assert_eq!(relay.backoff_for(2), Duration::from_millis(200));
        assert_eq!(relay.backoff_for(3), Duration::from_millis(400));
    }

    #[test]
    fn missing_api_key_variable_yields_none() {
        let relay = RelayConfig {
            api_key_var: "PROMPTLAB_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..RelayConfig::default()
        };
        assert!(relay.api_key().is_none());
    }
}
