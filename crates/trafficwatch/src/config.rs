//! Configuration management for trafficwatch.
//!
//! Loaded with figment from defaults, a TOML file and environment variables.

use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::settings::Settings;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Directory under the user config dir.
const CONFIG_DIR_NAME: &str = "trafficwatch";

/// Prefix for environment overrides, e.g. `TRAFFICWATCH_API__BASE_URL`.
const ENV_PREFIX: &str = "TRAFFICWATCH_";

/// Backend the dashboard talks to when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "https://traffic-control-system-production.up.railway.app";

/// Static hosting domain that cannot carry its own backend.
const STATIC_HOSTING_MARKER: &str = "github.io";

/// Application configuration.
///
/// Sources, highest precedence first:
/// 1. Environment variables prefixed with `TRAFFICWATCH_`, nested keys
///    separated by `__`
/// 2. TOML config file at `~/.config/trafficwatch/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend access.
    pub api: ApiConfig,
    /// Refresh intervals.
    pub polling: PollingConfig,
    /// Local dashboard settings.
    pub settings: Settings,
}

/// Backend access configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Explicit backend base URL.
    pub base_url: Option<String>,
    /// Domain the dashboard is served from, if known. Static hosting
    /// domains always use the production backend.
    pub hosting_domain: Option<String>,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

/// Polling configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Seconds between density refreshes on the home view.
    pub density_interval_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            hosting_domain: None,
            request_timeout_secs: 10,
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            density_interval_secs: 48,
        }
    }
}

impl ApiConfig {
    /// Resolve the backend base URL.
    ///
    /// Static hosting wins, then the explicit override, then
    /// [`DEFAULT_BASE_URL`]. A trailing slash is removed.
    #[must_use]
    pub fn resolve_base_url(&self) -> String {
        let hosted_statically = self
            .hosting_domain
            .as_deref()
            .is_some_and(|domain| domain.contains(STATIC_HOSTING_MARKER));

        let url = if hosted_statically {
            DEFAULT_BASE_URL
        } else {
            self.base_url
                .as_deref()
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .unwrap_or(DEFAULT_BASE_URL)
        };

        url.trim_end_matches('/').to_string()
    }

    /// Request timeout as a Duration.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Config {
    /// Load configuration, from `config_path` or the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation
    /// fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);
        debug!(path = %config_file.display(), "Loading configuration");

        let config: Config = Self::figment(&config_file).extract()?;
        config.validate()?;
        Ok(config)
    }

    fn figment(config_file: &Path) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.api.request_timeout_secs == 0 {
            return Err(Error::config_validation(
                "request_timeout_secs must be greater than 0",
            ));
        }

        if let Some(url) = self.api.base_url.as_deref().map(str::trim) {
            if !url.is_empty() && !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(Error::config_validation(format!(
                    "base_url must start with http:// or https://: {url}"
                )));
            }
        }

        if self.polling.density_interval_secs == 0 {
            return Err(Error::config_validation(
                "density_interval_secs must be greater than 0",
            ));
        }

        self.settings.validate()
    }

    /// Resolved backend base URL. See [`ApiConfig::resolve_base_url`].
    #[must_use]
    pub fn base_url(&self) -> String {
        self.api.resolve_base_url()
    }

    /// Density polling interval as a Duration.
    #[must_use]
    pub fn density_interval(&self) -> Duration {
        Duration::from_secs(self.polling.density_interval_secs)
    }
}
