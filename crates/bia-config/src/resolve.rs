//! Configuration resolution and path discovery.
//!
//! Resolution order: CLI argument → environment variables → XDG paths → defaults.

use std::path::{Path, PathBuf};

use crate::analytics::AnalyticsConfig;
use crate::validate::{validate_config, ValidationError, ValidationResult};

/// Where the configuration was found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly provided via CLI argument.
    CliArgument,

    /// Set via BIA_CONFIG or BIA_CONFIG_DIR.
    Environment,

    /// Found in the XDG config directory.
    XdgConfig,

    /// Using built-in defaults.
    #[default]
    BuiltinDefault,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::CliArgument => write!(f, "CLI argument"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::XdgConfig => write!(f, "XDG config"),
            ConfigSource::BuiltinDefault => write!(f, "builtin default"),
        }
    }
}

/// Environment variable names.
pub const ENV_CONFIG_PATH: &str = "BIA_CONFIG";
pub const ENV_CONFIG_DIR: &str = "BIA_CONFIG_DIR";

/// Standard config file name.
pub const CONFIG_FILENAME: &str = "analytics.json";

/// Application name for XDG directories.
const APP_NAME: &str = "bi-analytics";

/// A configuration together with its provenance.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: AnalyticsConfig,
    pub source: ConfigSource,
    pub path: Option<PathBuf>,
    /// File content as read, kept for snapshot hashing.
    pub raw: Option<String>,
}

impl LoadedConfig {
    pub fn defaults() -> Self {
        Self {
            config: AnalyticsConfig::default(),
            source: ConfigSource::BuiltinDefault,
            path: None,
            raw: None,
        }
    }
}

/// Resolve the configuration file path.
///
/// 1. Explicit CLI path (returned even if missing so the load reports it)
/// 2. BIA_CONFIG (direct path)
/// 3. BIA_CONFIG_DIR + analytics.json
/// 4. XDG config directory (~/.config/bi-analytics/analytics.json)
/// 5. Built-in defaults (None)
pub fn resolve_config_path(cli_path: Option<&Path>) -> (Option<PathBuf>, ConfigSource) {
    if let Some(path) = cli_path {
        return (Some(path.to_path_buf()), ConfigSource::CliArgument);
    }

    if let Ok(env_path) = std::env::var(ENV_CONFIG_PATH) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return (Some(path), ConfigSource::Environment);
        }
    }

    if let Ok(config_dir) = std::env::var(ENV_CONFIG_DIR) {
        let path = PathBuf::from(config_dir).join(CONFIG_FILENAME);
        if path.exists() {
            return (Some(path), ConfigSource::Environment);
        }
    }

    if let Some(dir) = xdg_config_dir() {
        let path = dir.join(CONFIG_FILENAME);
        if path.exists() {
            return (Some(path), ConfigSource::XdgConfig);
        }
    }

    (None, ConfigSource::BuiltinDefault)
}

/// Get the XDG config directory for bi-analytics.
pub fn xdg_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME))
}

/// Resolve, read, parse and validate the configuration.
pub fn load_config(cli_path: Option<&Path>) -> ValidationResult<LoadedConfig> {
    let (path, source) = resolve_config_path(cli_path);
    let Some(path) = path else {
        return Ok(LoadedConfig::defaults());
    };

    let raw = std::fs::read_to_string(&path).map_err(|e| {
        ValidationError::IoError(format!("Failed to read {}: {}", path.display(), e))
    })?;
    let config = AnalyticsConfig::from_json(&raw)?;
    validate_config(&config)?;

    Ok(LoadedConfig {
        config,
        source,
        path: Some(path),
        raw: Some(raw),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_source_display() {
        assert_eq!(ConfigSource::CliArgument.to_string(), "CLI argument");
        assert_eq!(ConfigSource::Environment.to_string(), "environment variable");
        assert_eq!(ConfigSource::XdgConfig.to_string(), "XDG config");
        assert_eq!(ConfigSource::BuiltinDefault.to_string(), "builtin default");
    }

    #[test]
    fn cli_path_wins_even_when_missing() {
        let missing = Path::new("/nonexistent/bia/analytics.json");
        let (path, source) = resolve_config_path(Some(missing));
        assert_eq!(path.as_deref(), Some(missing));
        assert_eq!(source, ConfigSource::CliArgument);
        assert!(matches!(
            load_config(Some(missing)),
            Err(ValidationError::IoError(_))
        ));
    }

    #[test]
    fn xdg_dir_is_namespaced() {
        if let Some(dir) = xdg_config_dir() {
            assert!(dir.ends_with(APP_NAME));
        }
    }
}
