//! Configuration system: TOML file + env var overrides + smart defaults.

#![allow(missing_docs)]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::{NavError, Result};

/// Full NavScope configuration model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
#[derive(Default)]
pub struct Config {
    pub feed: FeedConfig,
    pub history: HistoryConfig,
    pub paths: PathsConfig,
    pub log: LogConfig,
}

/// Upstream snapshot feed settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FeedConfig {
    /// `host:port` of the newline-delimited JSON snapshot stream.
    pub endpoint: String,
    /// Delay between reconnect attempts after a drop.
    pub reconnect_delay_ms: u64,
    /// Use the built-in synthetic feed instead of connecting out.
    pub dummy: bool,
    /// Interval between synthetic snapshots when `dummy` is on.
    pub dummy_interval_ms: u64,
}

/// Signal-history window tuning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HistoryConfig {
    /// Sliding window length in seconds.
    pub window_secs: u64,
    /// Maximum number of satellite series surfaced to chart consumers.
    pub max_chart_lines: usize,
}

/// Filesystem paths used by navscope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PathsConfig {
    pub config_file: PathBuf,
    /// Directory holding layout slots and preferences.
    pub state_dir: PathBuf,
}

/// Activity log settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LogConfig {
    pub jsonl_log: PathBuf,
    pub max_size_bytes: u64,
    pub max_rotated_files: u32,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            endpoint: "127.0.0.1:8765".to_string(),
            reconnect_delay_ms: 1_000,
            dummy: false,
            dummy_interval_ms: 500,
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            window_secs: 60,
            max_chart_lines: 12,
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        let home_dir = env::var_os("HOME").map_or_else(
            || {
                eprintln!(
                    "[NAV-CONFIG] WARNING: HOME not set, falling back to /tmp for data paths"
                );
                PathBuf::from("/tmp")
            },
            PathBuf::from,
        );
        let cfg_dir = home_dir.join(".config").join("navscope");
        Self {
            config_file: cfg_dir.join("config.toml"),
            state_dir: cfg_dir,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        let home_dir = env::var_os("HOME").map_or_else(|| PathBuf::from("/tmp"), PathBuf::from);
        Self {
            jsonl_log: home_dir
                .join(".local")
                .join("share")
                .join("navscope")
                .join("activity.jsonl"),
            max_size_bytes: 20 * 1024 * 1024,
            max_rotated_files: 3,
        }
    }
}

impl Config {
    /// Default configuration path.
    #[must_use]
    pub fn default_path() -> PathBuf {
        PathsConfig::default().config_file
    }

    /// Load config from default or explicit path, then apply env overrides.
    ///
    /// Missing config file is not an error when loading from the default
    /// path; defaults are used.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path_buf = path.map_or_else(Self::default_path, Path::to_path_buf);
        let is_explicit_path = path.is_some();

        let mut cfg = if path_buf.exists() {
            let raw = fs::read_to_string(&path_buf).map_err(|source| NavError::Io {
                path: path_buf.clone(),
                source,
            })?;
            let parsed: Self = toml::from_str(&raw)?;
            parsed
        } else if is_explicit_path {
            return Err(NavError::MissingConfig { path: path_buf });
        } else {
            Self::default()
        };

        cfg.paths.config_file = path_buf;
        cfg.apply_env_overrides()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(raw) = env_var("NAVSCOPE_ENDPOINT") {
            self.feed.endpoint = raw;
        }
        set_env_u64(
            "NAVSCOPE_RECONNECT_DELAY_MS",
            &mut self.feed.reconnect_delay_ms,
        )?;
        set_env_bool("NAVSCOPE_DUMMY", &mut self.feed.dummy)?;
        set_env_u64(
            "NAVSCOPE_DUMMY_INTERVAL_MS",
            &mut self.feed.dummy_interval_ms,
        )?;

        set_env_u64("NAVSCOPE_HISTORY_WINDOW_SECS", &mut self.history.window_secs)?;
        set_env_usize(
            "NAVSCOPE_HISTORY_MAX_CHART_LINES",
            &mut self.history.max_chart_lines,
        )?;

        if let Some(raw) = env_var("NAVSCOPE_STATE_DIR") {
            self.paths.state_dir = PathBuf::from(raw);
        }
        if let Some(raw) = env_var("NAVSCOPE_JSONL_LOG") {
            self.log.jsonl_log = PathBuf::from(raw);
        }

        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.feed.endpoint.trim().is_empty() {
            return Err(NavError::InvalidConfig {
                details: "feed.endpoint must not be empty".to_string(),
            });
        }
        if self.feed.reconnect_delay_ms == 0 {
            return Err(NavError::InvalidConfig {
                details: "feed.reconnect_delay_ms must be > 0".to_string(),
            });
        }
        if self.feed.dummy_interval_ms == 0 {
            return Err(NavError::InvalidConfig {
                details: "feed.dummy_interval_ms must be > 0".to_string(),
            });
        }
        if self.history.window_secs == 0 {
            return Err(NavError::InvalidConfig {
                details: "history.window_secs must be > 0".to_string(),
            });
        }
        if self.history.max_chart_lines == 0 {
            return Err(NavError::InvalidConfig {
                details: "history.max_chart_lines must be > 0".to_string(),
            });
        }
        if self.log.max_size_bytes == 0 {
            return Err(NavError::InvalidConfig {
                details: "log.max_size_bytes must be > 0".to_string(),
            });
        }
        Ok(())
    }
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|raw| !raw.trim().is_empty())
}

fn set_env_u64(name: &str, slot: &mut u64) -> Result<()> {
    if let Some(raw) = env_var(name) {
        *slot = raw.parse::<u64>().map_err(|error| NavError::ConfigParse {
            context: "env",
            details: format!("{name}={raw:?}: {error}"),
        })?;
    }
    Ok(())
}

fn set_env_usize(name: &str, slot: &mut usize) -> Result<()> {
    if let Some(raw) = env_var(name) {
        *slot = raw
            .parse::<usize>()
            .map_err(|error| NavError::ConfigParse {
                context: "env",
                details: format!("{name}={raw:?}: {error}"),
            })?;
    }
    Ok(())
}

fn set_env_bool(name: &str, slot: &mut bool) -> Result<()> {
    if let Some(raw) = env_var(name) {
        *slot = raw.parse::<bool>().map_err(|error| NavError::ConfigParse {
            context: "env",
            details: format!("{name}={raw:?}: {error}"),
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let cfg = Config::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.feed.endpoint, "127.0.0.1:8765");
        assert_eq!(cfg.feed.reconnect_delay_ms, 1_000);
        assert_eq!(cfg.history.window_secs, 60);
        assert_eq!(cfg.history.max_chart_lines, 12);
    }

    #[test]
    fn load_missing_explicit_path_errors() {
        let err = Config::load(Some(Path::new("/nonexistent/navscope/config.toml"))).unwrap_err();
        assert_eq!(err.code(), "NAV-1002");
    }

    #[test]
    fn load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[feed]\nendpoint = \"10.0.0.5:9000\"\nreconnect_delay_ms = 2500\n",
        )
        .unwrap();
        let cfg = Config::load(Some(&path)).unwrap();
        assert_eq!(cfg.feed.endpoint, "10.0.0.5:9000");
        assert_eq!(cfg.feed.reconnect_delay_ms, 2_500);
        // Untouched sections keep defaults.
        assert_eq!(cfg.history.window_secs, 60);
        assert_eq!(cfg.paths.config_file, path);
    }

    #[test]
    fn load_rejects_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "= broken").unwrap();
        let err = Config::load(Some(&path)).unwrap_err();
        assert_eq!(err.code(), "NAV-1003");
    }

    #[test]
    fn validate_rejects_empty_endpoint() {
        let mut cfg = Config::default();
        cfg.feed.endpoint = "   ".to_string();
        let err = cfg.validate().unwrap_err();
        assert_eq!(err.code(), "NAV-1001");
    }

    #[test]
    fn validate_rejects_zero_window() {
        let mut cfg = Config::default();
        cfg.history.window_secs = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_reconnect_delay() {
        let mut cfg = Config::default();
        cfg.feed.reconnect_delay_ms = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn toml_roundtrip() {
        let cfg = Config::default();
        let raw = toml::to_string(&cfg).unwrap();
        let back: Config = toml::from_str(&raw).unwrap();
        assert_eq!(cfg, back);
    }
}
