// SPDX-License-Identifier: MPL-2.0
//! This module handles the application's configuration, including loading and saving
//! settings to a `settings.toml` file.
//!
//! Every field is optional in the file; accessors fall back to the values in
//! [`defaults`]. The API base URL can also come from the
//! `PROPERTY_NOTIFICATIONS_API_URL` environment variable, which wins over the file.
//!
//! # Examples
//!
//! ```no_run
//! use property_notifications::config::{self, Config};
//!
//! let config = config::load().unwrap_or_default();
//! let url = config.validated_base_url().expect("invalid base URL");
//! println!("polling {url} every {:?}", config.poll_interval());
//! ```

pub mod defaults;

pub use defaults::*;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

const CONFIG_FILE: &str = "settings.toml";
const APP_NAME: &str = "PropertyNotifications";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api_base_url: Option<String>,
    #[serde(default)]
    pub poll_interval_secs: Option<u64>,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    /// Raw `name=value` cookie attached to every request.
    #[serde(default)]
    pub session_cookie: Option<String>,
    #[serde(default)]
    pub log_level: Option<String>,
}

impl Config {
    /// Returns the configured base URL, or the default.
    #[must_use]
    pub fn api_base_url(&self) -> &str {
        self.api_base_url.as_deref().unwrap_or(DEFAULT_API_BASE_URL)
    }

    /// Parses the base URL, accepting only `http` and `https`.
    pub fn validated_base_url(&self) -> Result<Url> {
        let raw = self.api_base_url();
        let url = Url::parse(raw).map_err(|e| Error::InvalidBaseUrl(format!("{raw}: {e}")))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(Error::InvalidBaseUrl(format!(
                "{raw}: unsupported scheme `{other}`"
            ))),
        }
    }

    /// Poll interval, clamped to the supported range.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        let secs = self
            .poll_interval_secs
            .unwrap_or(DEFAULT_POLL_INTERVAL_SECS)
            .clamp(MIN_POLL_INTERVAL_SECS, MAX_POLL_INTERVAL_SECS);
        Duration::from_secs(secs)
    }

    /// Request timeout, clamped to the supported range.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        let secs = self
            .request_timeout_secs
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS)
            .clamp(MIN_REQUEST_TIMEOUT_SECS, MAX_REQUEST_TIMEOUT_SECS);
        Duration::from_secs(secs)
    }

    #[must_use]
    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    /// Replaces the base URL with `value` when it is set and non-empty.
    #[must_use]
    pub fn with_base_url_override(mut self, value: Option<String>) -> Self {
        if let Some(url) = value.filter(|v| !v.trim().is_empty()) {
            self.api_base_url = Some(url.trim().to_string());
        }
        self
    }

    /// Applies overrides from the process environment.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_base_url_override(std::env::var(API_URL_ENV_VAR).ok())
    }
}

fn get_default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path.push(CONFIG_FILE);
        path
    })
}

/// Loads the config from the default location, then applies environment overrides.
pub fn load() -> Result<Config> {
    let config = match get_default_config_path() {
        Some(path) if path.exists() => load_from_path(&path)?,
        _ => Config::default(),
    };
    Ok(config.with_env_overrides())
}

pub fn save(config: &Config) -> Result<()> {
    if let Some(path) = get_default_config_path() {
        return save_to_path(config, &path);
    }
    Ok(())
}

/// Reads a config file. A file that is not valid TOML yields the defaults.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    match toml::from_str(&content) {
        Ok(config) => Ok(config),
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "ignoring unparsable config file");
            Ok(Config::default())
        }
    }
}

pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn save_and_load_round_trip_preserves_fields() {
        let config = Config {
            api_base_url: Some("https://estate.example.com/api".to_string()),
            poll_interval_secs: Some(30),
            request_timeout_secs: Some(5),
            session_cookie: Some("SESSION=abc".to_string()),
            log_level: Some("debug".to_string()),
        };
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join("settings.toml");

        save_to_path(&config, &config_path).expect("failed to save config");
        let loaded = load_from_path(&config_path).expect("failed to load config");

        assert_eq!(loaded, config);
    }

    #[test]
    fn load_from_path_returns_default_on_invalid_toml() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(&config_path, "not = valid = toml").expect("failed to write invalid toml");

        let loaded = load_from_path(&config_path).expect("load should not error");
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn load_from_missing_path_is_an_io_error() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let result = load_from_path(&temp_dir.path().join("absent.toml"));
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn defaults_apply_when_fields_are_missing() {
        let config: Config = toml::from_str("").expect("empty toml is valid");
        assert_eq!(config.api_base_url(), DEFAULT_API_BASE_URL);
        assert_eq!(
            config.poll_interval(),
            Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS)
        );
        assert_eq!(
            config.request_timeout(),
            Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)
        );
        assert_eq!(config.log_level(), DEFAULT_LOG_LEVEL);
    }

    #[test]
    fn durations_are_clamped() {
        let config = Config {
            poll_interval_secs: Some(0),
            request_timeout_secs: Some(10_000),
            ..Config::default()
        };
        assert_eq!(
            config.poll_interval(),
            Duration::from_secs(MIN_POLL_INTERVAL_SECS)
        );
        assert_eq!(
            config.request_timeout(),
            Duration::from_secs(MAX_REQUEST_TIMEOUT_SECS)
        );
    }

    #[test]
    fn base_url_override_wins_when_non_empty() {
        let config = Config {
            api_base_url: Some("http://file.example/api".into()),
            ..Config::default()
        };

        let kept = config.clone().with_base_url_override(Some("   ".into()));
        assert_eq!(kept.api_base_url(), "http://file.example/api");

        let replaced = config.with_base_url_override(Some("https://env.example/api".into()));
        assert_eq!(replaced.api_base_url(), "https://env.example/api");
    }

    #[test]
    fn validated_base_url_rejects_other_schemes() {
        let config = Config {
            api_base_url: Some("ftp://files.example".into()),
            ..Config::default()
        };
        assert!(matches!(
            config.validated_base_url(),
            Err(Error::InvalidBaseUrl(_))
        ));

        let config = Config {
            api_base_url: Some("not a url".into()),
            ..Config::default()
        };
        assert!(config.validated_base_url().is_err());

        assert!(Config::default().validated_base_url().is_ok());
    }
}
