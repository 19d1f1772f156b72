//! Configuration resolution for webaudit
//!
//! Per-key priority: environment variable → TOML config file → compiled
//! default. There is no persistent settings store; the service is
//! stateless between runs.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Default analysis engine endpoint (POST {"url": ...})
pub const DEFAULT_ENGINE_URL: &str = "http://127.0.0.1:8000/analyze";
/// Default bind address for the HTTP surface
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:5810";
/// Default engine request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

/// Raw TOML shape; every key optional
#[derive(Debug, Default, Deserialize)]
struct TomlConfig {
    engine_url: Option<String>,
    listen_addr: Option<String>,
    request_timeout_secs: Option<u64>,
}

/// Resolved service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Analysis engine endpoint receiving POST {"url": ...}
    pub engine_url: String,
    /// Address the HTTP surface binds to
    pub listen_addr: String,
    /// Client timeout for engine calls
    pub request_timeout_secs: u64,
}

impl ServiceConfig {
    /// Load from the default config path (`~/.config/webaudit/config.toml`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(default_config_path().as_deref())
    }

    /// Load with an explicit TOML path
    ///
    /// A missing file falls through to ENV/defaults; an unreadable or
    /// malformed file is an error, not a silent fallback.
    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(p) if p.exists() => read_toml(p)?,
            _ => TomlConfig::default(),
        };

        let engine_url = resolve_string(
            "WEBAUDIT_ENGINE_URL",
            file.engine_url,
            DEFAULT_ENGINE_URL,
        );
        let listen_addr = resolve_string(
            "WEBAUDIT_LISTEN_ADDR",
            file.listen_addr,
            DEFAULT_LISTEN_ADDR,
        );
        let request_timeout_secs = resolve_timeout(file.request_timeout_secs);

        Ok(ServiceConfig {
            engine_url,
            listen_addr,
            request_timeout_secs,
        })
    }
}

fn read_toml(path: &Path) -> Result<TomlConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}

fn resolve_string(env_var: &str, file_value: Option<String>, default: &str) -> String {
    if let Ok(value) = std::env::var(env_var) {
        if !value.trim().is_empty() {
            info!("{} loaded from environment", env_var);
            return value;
        }
    }
    if let Some(value) = file_value {
        return value;
    }
    default.to_string()
}

fn resolve_timeout(file_value: Option<u64>) -> u64 {
    if let Ok(value) = std::env::var("WEBAUDIT_REQUEST_TIMEOUT_SECS") {
        match value.parse::<u64>() {
            Ok(secs) => {
                info!("WEBAUDIT_REQUEST_TIMEOUT_SECS loaded from environment");
                return secs;
            }
            Err(_) => {
                warn!(
                    "WEBAUDIT_REQUEST_TIMEOUT_SECS is not a valid integer: {}. Ignoring.",
                    value
                );
            }
        }
    }
    file_value.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS)
}

/// Platform config file path (`<config dir>/webaudit/config.toml`)
fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("webaudit").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    fn clear_env() {
        std::env::remove_var("WEBAUDIT_ENGINE_URL");
        std::env::remove_var("WEBAUDIT_LISTEN_ADDR");
        std::env::remove_var("WEBAUDIT_REQUEST_TIMEOUT_SECS");
    }

    #[test]
    #[serial]
    fn test_defaults_without_file_or_env() {
        clear_env();
        let config = ServiceConfig::load_from(None).unwrap();
        assert_eq!(config.engine_url, DEFAULT_ENGINE_URL);
        assert_eq!(config.listen_addr, DEFAULT_LISTEN_ADDR);
        assert_eq!(config.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
    }

    #[test]
    #[serial]
    fn test_file_values_override_defaults() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "engine_url = \"http://engine.internal/analyze\"\nrequest_timeout_secs = 5"
        )
        .unwrap();

        let config = ServiceConfig::load_from(Some(&path)).unwrap();
        assert_eq!(config.engine_url, "http://engine.internal/analyze");
        assert_eq!(config.listen_addr, DEFAULT_LISTEN_ADDR);
        assert_eq!(config.request_timeout_secs, 5);
    }

    #[test]
    #[serial]
    fn test_env_overrides_file() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "engine_url = \"http://from-file/analyze\"").unwrap();

        std::env::set_var("WEBAUDIT_ENGINE_URL", "http://from-env/analyze");
        let config = ServiceConfig::load_from(Some(&path)).unwrap();
        clear_env();

        assert_eq!(config.engine_url, "http://from-env/analyze");
    }

    #[test]
    #[serial]
    fn test_malformed_toml_is_an_error() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "engine_url = [not toml").unwrap();

        let result = ServiceConfig::load_from(Some(&path));
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    #[serial]
    fn test_missing_file_falls_through() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("does-not-exist.toml");
        let config = ServiceConfig::load_from(Some(&path)).unwrap();
        assert_eq!(config.engine_url, DEFAULT_ENGINE_URL);
    }
}
