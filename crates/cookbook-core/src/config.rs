//! Configuration management for cookbook.
//!
//! Loads configuration from ${COOKBOOK_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Env var that overrides `identity.api_key`.
pub const API_KEY_ENV: &str = "COOKBOOK_API_KEY";
/// Env var that overrides `identity.base_url`.
pub const IDENTITY_URL_ENV: &str = "COOKBOOK_IDENTITY_URL";

/// Returns the default config template with comments.
///
/// Embedded from default_config.toml at compile time.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

pub mod paths {
    //! Path resolution for cookbook configuration and data files.
    //!
    //! COOKBOOK_HOME resolution order:
    //! 1. COOKBOOK_HOME environment variable (if set)
    //! 2. ~/.config/cookbook (default)

    use std::path::PathBuf;

    /// Session file name inside the cookbook home.
    pub const SESSION_FILE: &str = "session.json";

    /// Returns the cookbook home directory.
    ///
    /// Checks COOKBOOK_HOME env var first, falls back to ~/.config/cookbook
    /// (or `.cookbook` in the working directory when no home is known).
    pub fn cookbook_home() -> PathBuf {
        if let Ok(home) = std::env::var("COOKBOOK_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".cookbook"),
            |h| h.join(".config").join("cookbook"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        cookbook_home().join("config.toml")
    }

    /// Returns the path to the persisted session.
    pub fn session_path() -> PathBuf {
        cookbook_home().join(SESSION_FILE)
    }

    /// Returns the directory log files are written to.
    pub fn logs_dir() -> PathBuf {
        cookbook_home().join("logs")
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Tracing filter used when `COOKBOOK_LOG` is unset.
    pub log_filter: String,

    /// Identity service settings.
    pub identity: IdentityConfig,
}

impl Config {
    const DEFAULT_LOG_FILTER: &str = "info";

    /// Loads configuration from the default config path, then applies
    /// environment overrides.
    pub fn load() -> Result<Self> {
        let config = Self::load_from(&paths::config_path())?;
        Ok(config.with_env_overrides(|key| std::env::var(key).ok()))
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Applies `COOKBOOK_API_KEY` / `COOKBOOK_IDENTITY_URL` through `lookup`.
    ///
    /// Blank values are ignored.
    #[must_use]
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_blank(API_KEY_ENV) {
            self.identity.api_key = Some(key);
        }
        if let Some(url) = non_blank(IDENTITY_URL_ENV) {
            self.identity.base_url = url;
        }
        self
    }

    /// Creates a default config file at the given path.
    /// Returns an error if the file already exists.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, default_config_template())
    }

    /// Writes config content to a file, creating parent directories as needed.
    /// Uses atomic write (temp file + rename) to prevent corruption.
    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: Self::DEFAULT_LOG_FILTER.to_string(),
            identity: IdentityConfig::default(),
        }
    }
}

/// Identity service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Service base URL; endpoint paths are appended to it.
    pub base_url: String,
    /// Web API key sent as the `key` query parameter.
    pub api_key: Option<String>,
    /// Path of the password sign-in endpoint.
    pub login_path: String,
    /// Path of the account creation endpoint.
    pub signup_path: String,
    /// Per-request timeout in seconds (0 disables).
    pub request_timeout_secs: u64,
}

impl IdentityConfig {
    const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/identitytoolkit/v3/relyingparty";
    const DEFAULT_LOGIN_PATH: &str = "verifyPassword";
    const DEFAULT_SIGNUP_PATH: &str = "signupNewUser";
    const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

    /// Returns the effective API key if set and non-empty.
    pub fn effective_api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Returns the request timeout, or `None` when disabled.
    pub fn request_timeout(&self) -> Option<Duration> {
        if self.request_timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.request_timeout_secs))
        }
    }
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            api_key: None,
            login_path: Self::DEFAULT_LOGIN_PATH.to_string(),
            signup_path: Self::DEFAULT_SIGNUP_PATH.to_string(),
            request_timeout_secs: Self::DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}
