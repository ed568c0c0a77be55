//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use crate::cache::TaskCacheStore;

/// Freshness window of the task cache.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 10 * 60;

const ENV_PREFIX: &str = "TIMECAMP_";

/// Keys whose environment values are taken verbatim, never type-parsed.
const STRING_KEYS: [&str; 4] = ["api_key", "api_url", "client_name", "cache_dir"];

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// TimeCamp API key. Required by every command.
    pub api_key: Option<String>,
    /// Root URL of the TimeCamp API.
    pub api_url: String,
    /// Identifier reported to the service on noted timer starts.
    pub client_name: String,
    /// Directory holding the task cache.
    pub cache_dir: PathBuf,
    /// How long a fetched task list is trusted.
    pub cache_ttl_secs: u64,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("api_url", &self.api_url)
            .field("client_name", &self.client_name)
            .field("cache_dir", &self.cache_dir)
            .field("cache_ttl_secs", &self.cache_ttl_secs)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: tc_api::DEFAULT_API_URL.to_string(),
            client_name: tc_api::DEFAULT_CLIENT_NAME.to_string(),
            cache_dir: dirs_cache_path().unwrap_or_else(|| PathBuf::from(".timecamp-cli")),
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (TIMECAMP_*)
        figment = figment.merge(Env::prefixed(ENV_PREFIX).ignore(&STRING_KEYS));
        for key in STRING_KEYS {
            let var = format!("{ENV_PREFIX}{}", key.to_ascii_uppercase());
            if let Ok(value) = std::env::var(&var) {
                figment = figment.merge(Serialized::default(key, value));
            }
        }

        figment.extract()
    }

    /// Returns the API key, failing when none is configured.
    pub fn require_api_key(&self) -> anyhow::Result<&str> {
        self.api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("Missing TIMECAMP_API_KEY environment variable."))
    }

    /// The task cache described by this configuration.
    pub fn task_cache(&self) -> TaskCacheStore {
        TaskCacheStore::new(&self.cache_dir, Duration::from_secs(self.cache_ttl_secs))
    }
}

/// Returns the platform-specific config directory for the CLI.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("timecamp-cli"))
}

/// Returns the platform-specific cache directory for the CLI.
///
/// On Linux: `~/.cache/timecamp-cli`
pub fn dirs_cache_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|p| p.join("timecamp-cli"))
}
