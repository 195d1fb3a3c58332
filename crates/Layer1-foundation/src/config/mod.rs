//! Ledger configuration
//!
//! Explicit configuration struct consumed by the ledger client. Values can
//! come from code, from the process environment, or from a TOML file - the
//! recognized options are exactly `{base_url, api_key, agent_id,
//! timeout_secs}`.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Default ledger endpoint for local development
pub const DEFAULT_LEDGER_URL: &str = "http://localhost:8080";

/// Default caller-assigned agent identifier
pub const DEFAULT_AGENT_ID: &str = "default-agent";

/// Fixed request timeout for ledger submissions, in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variable holding the ledger base URL
pub const ENV_LEDGER_URL: &str = "SEALTRACE_LEDGER_URL";

/// Environment variable holding the ledger API key
pub const ENV_API_KEY: &str = "SEALTRACE_API_KEY";

/// Environment variable holding the agent identifier
pub const ENV_AGENT_ID: &str = "SEALTRACE_AGENT_ID";

// ============================================================================
// LedgerConfig
// ============================================================================

/// Connection settings for the remote compliance ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Base URL of the ledger service (no trailing path)
    pub base_url: String,

    /// Bearer credential; omitted header when `None`
    pub api_key: Option<String>,

    /// Caller-assigned agent identifier stamped on every event
    pub agent_id: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_LEDGER_URL.to_string(),
            api_key: None,
            agent_id: DEFAULT_AGENT_ID.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl LedgerConfig {
    /// Create a config pointing at a ledger base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the bearer credential
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the agent identifier
    pub fn with_agent_id(mut self, agent_id: impl Into<String>) -> Self {
        self.agent_id = agent_id.into();
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = timeout.as_secs();
        self
    }

    /// Request timeout as a [`Duration`]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Load from the process environment, falling back to defaults for
    /// anything unset
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var(ENV_LEDGER_URL) {
            config.base_url = url;
        }
        if let Ok(key) = std::env::var(ENV_API_KEY) {
            config.api_key = Some(key);
        }
        if let Ok(agent) = std::env::var(ENV_AGENT_ID) {
            config.agent_id = agent;
        }
        config
    }

    /// Load from a TOML file
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        debug!(path = %path.display(), "ledger config loaded");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = LedgerConfig::default();
        assert_eq!(config.base_url, DEFAULT_LEDGER_URL);
        assert_eq!(config.agent_id, DEFAULT_AGENT_ID);
        assert_eq!(config.api_key, None);
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_builder() {
        let config = LedgerConfig::new("https://ledger.example.eu")
            .with_api_key("sk-test")
            .with_agent_id("bedrock-agent")
            .with_timeout(Duration::from_secs(5));

        assert_eq!(config.base_url, "https://ledger.example.eu");
        assert_eq!(config.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.agent_id, "bedrock-agent");
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn test_from_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
base_url = "https://ledger.example.eu"
api_key = "sk-test"
agent_id = "vertex-agent"
"#
        )
        .unwrap();

        let config = LedgerConfig::from_toml_file(file.path()).unwrap();
        assert_eq!(config.base_url, "https://ledger.example.eu");
        assert_eq!(config.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.agent_id, "vertex-agent");
        // Unset fields fall back to defaults
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_from_toml_file_missing() {
        let result = LedgerConfig::from_toml_file("/nonexistent/sealtrace.toml");
        assert!(result.is_err());
    }
}
