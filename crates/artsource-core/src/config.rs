use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable that overrides `tumblr.api_key`.
pub const TUMBLR_API_KEY_ENV: &str = "ARTSOURCE_TUMBLR_API_KEY";

/// Outbound HTTP settings shared by every resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Upper bound for a single request, in seconds.
    pub timeout_secs: u64,
    /// Upper bound for establishing a connection, in seconds.
    pub connect_timeout_secs: u64,
    /// Overall budget for one resolution; 0 disables the limit.
    pub resolution_deadline_secs: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            connect_timeout_secs: 15,
            resolution_deadline_secs: 90,
            user_agent: concat!("artsource/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn resolution_deadline(&self) -> Option<Duration> {
        (self.resolution_deadline_secs > 0).then(|| Duration::from_secs(self.resolution_deadline_secs))
    }
}

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per request (including the first).
    pub max_attempts: u32,
    /// Base delay in seconds for exponential backoff (e.g. 0.25 = 250ms).
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_secs: 0.25,
            max_delay_secs: 5,
        }
    }
}

/// Tumblr API access.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TumblrConfig {
    /// Administrative switch; the API is never called when false.
    pub enabled: bool,
    /// OAuth consumer key, sent as `api_key`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for TumblrConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: None,
        }
    }
}

impl TumblrConfig {
    /// The key to use, or `None` when the platform is disabled or unconfigured.
    pub fn active_api_key(&self) -> Option<&str> {
        if !self.enabled {
            return None;
        }
        self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }
}

/// Global configuration loaded from `~/.config/artsource/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub http: HttpConfig,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
    #[serde(default)]
    pub tumblr: TumblrConfig,
}

impl Config {
    /// Applies environment overrides (currently only the Tumblr API key).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(key) = std::env::var(TUMBLR_API_KEY_ENV) {
            if !key.trim().is_empty() {
                self.tumblr.api_key = Some(key);
            }
        }
        self
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("artsource")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<Config> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = Config::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg.with_env_overrides());
    }

    load_from(&path)
}

/// Load configuration from an explicit path.
pub fn load_from(path: &Path) -> Result<Config> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("read config file: {}", path.display()))?;
    let cfg: Config = toml::from_str(&data)
        .with_context(|| format!("parse config file: {}", path.display()))?;
    Ok(cfg.with_env_overrides())
}
