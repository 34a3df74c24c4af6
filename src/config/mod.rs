//! Config file loading
//!
//! JSON config resolved from `$GRUN_CONFIG`, then the XDG config dir, then
//! the classic `~/.grun.json`. A missing or broken file degrades to
//! defaults; the dashboard never refuses to start over configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

const DEFAULT_MAX_LENGTH: u32 = 280;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Character budget for free-text input widgets
    #[serde(default = "default_max_length")]
    pub max_length: u32,
}

fn default_max_length() -> u32 {
    DEFAULT_MAX_LENGTH
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_LENGTH,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("max_length must be positive")]
    InvalidMaxLength,
}

/// Load the config, falling back to defaults on any failure. A missing
/// file is normal and logged at debug; a broken one is worth a warning.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        return Config::default();
    };
    if !path.exists() {
        tracing::debug!("no config at {}, using defaults", path.display());
        return Config::default();
    }
    match load_from(&path) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("ignoring config {}: {err}", path.display());
            Config::default()
        }
    }
}

pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: Config = serde_json::from_str(&content)?;
    if config.max_length == 0 {
        return Err(ConfigError::InvalidMaxLength);
    }
    Ok(config)
}

pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("GRUN_CONFIG").map(PathBuf::from) {
        return Some(path);
    }
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from) {
        let candidate = xdg.join("grun").join("config.json");
        if candidate.exists() {
            return Some(candidate);
        }
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".grun.json"));
    }

    directories::ProjectDirs::from("io", "grun", "grun")
        .map(|dirs| dirs.config_dir().join("config.json"))
}

/// Where log files go when the TUI owns the terminal.
pub fn data_dir() -> Option<PathBuf> {
    if let Some(xdg) = std::env::var_os("XDG_DATA_HOME").map(PathBuf::from) {
        return Some(xdg.join("grun"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".local").join("share").join("grun"));
    }
    directories::ProjectDirs::from("io", "grun", "grun").map(|dirs| dirs.data_dir().to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("grun-config-test-{name}.json"));
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_valid_config() {
        let path = write_temp("valid", r#"{ "max_length": 140 }"#);
        let config = load_from(&path).unwrap();
        assert_eq!(config.max_length, 140);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn missing_field_uses_default() {
        let path = write_temp("empty-object", "{}");
        let config = load_from(&path).unwrap();
        assert_eq!(config.max_length, DEFAULT_MAX_LENGTH);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn zero_max_length_is_invalid() {
        let path = write_temp("zero", r#"{ "max_length": 0 }"#);
        assert!(matches!(
            load_from(&path),
            Err(ConfigError::InvalidMaxLength)
        ));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn garbage_is_a_parse_error() {
        let path = write_temp("garbage", "not json");
        assert!(matches!(load_from(&path), Err(ConfigError::Parse(_))));
        let _ = fs::remove_file(path);
    }
}
