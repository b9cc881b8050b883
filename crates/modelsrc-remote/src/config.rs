use crate::RemoteError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_REGISTRY_URL: &str = "https://registry.ollama.ai";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegistryConfig {
    pub url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self::new(DEFAULT_REGISTRY_URL)
    }
}

impl RegistryConfig {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.trim_end_matches('/').to_owned(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Reject anything that is not an absolute http(s) URL.
    pub fn validate(&self) -> Result<(), RemoteError> {
        let rest = self
            .url
            .strip_prefix("https://")
            .or_else(|| self.url.strip_prefix("http://"))
            .ok_or_else(|| {
                RemoteError::Config(format!(
                    "registry URL must start with http:// or https://: '{}'",
                    self.url
                ))
            })?;
        if rest.is_empty() || rest.starts_with('/') {
            return Err(RemoteError::Config(format!(
                "registry URL has no host: '{}'",
                self.url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(RemoteError::Config("timeout must be at least 1s".to_owned()));
        }
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, RemoteError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = serde_json::from_str(&content)
            .map_err(|e| RemoteError::Config(format!("invalid registry config: {e}")))?;
        config.url = config.url.trim_end_matches('/').to_owned();
        Ok(config)
    }
}

pub fn default_config_path() -> Result<PathBuf, RemoteError> {
    let home = std::env::var("HOME").map_err(|_| RemoteError::Config("HOME not set".to_owned()))?;
    Ok(PathBuf::from(home).join(".config/modelsrc/registry.json"))
}
