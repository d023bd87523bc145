//! Configuration module
//!
//! Settings are read from a TOML file, by default
//! `~/.config/netbird-dash/config.toml`. Every section and key is optional:
//!
//! ```toml
//! [logging]
//! level = "debug"
//! format = "json"
//!
//! [pagination]
//! default_page_size = 25
//! max_page_size = 100
//!
//! [fetch]
//! max_attempts = 3
//! initial_delay = 200      # milliseconds
//! backoff_multiplier = 2.0
//! max_delay = 5000         # milliseconds
//!
//! [release]
//! current_version = "0.27.0"
//! source_path = "/var/lib/netbird-dash/release.json"
//! check_interval_secs = 21600
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::services::ReleaseMonitorConfig;
use crate::domain::pagination::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::domain::{PaginationParams, Version};
use crate::shared::RetryConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Default location of the configuration file
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("netbird-dash")
        .join("config.toml")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, overridden by `RUST_LOG`
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    pub default_page_size: u32,
    pub max_page_size: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

impl PaginationConfig {
    /// Fill in defaults and clamp to the configured bounds.
    pub fn params(&self, page: Option<u32>, page_size: Option<u32>) -> PaginationParams {
        PaginationParams::new(
            page.unwrap_or(1),
            page_size.unwrap_or(self.default_page_size),
        )
        .normalize(self.max_page_size)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseConfig {
    /// Version of the running installation
    pub current_version: Option<Version>,
    /// JSON file holding the latest release descriptor
    pub source_path: Option<PathBuf>,
    pub check_interval_secs: u64,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            current_version: None,
            source_path: None,
            check_interval_secs: 6 * 60 * 60,
        }
    }
}

/// Top-level application configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub pagination: PaginationConfig,
    pub fetch: RetryConfig,
    pub release: ReleaseConfig,
}

impl AppConfig {
    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pagination.max_page_size == 0 {
            return Err(ConfigError::Invalid(
                "pagination.max_page_size must be at least 1".into(),
            ));
        }
        if self.pagination.default_page_size == 0
            || self.pagination.default_page_size > self.pagination.max_page_size
        {
            return Err(ConfigError::Invalid(format!(
                "pagination.default_page_size must be between 1 and {}",
                self.pagination.max_page_size
            )));
        }
        if self.release.check_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "release.check_interval_secs must be at least 1".into(),
            ));
        }
        if !(self.fetch.backoff_multiplier >= 1.0) {
            return Err(ConfigError::Invalid(
                "fetch.backoff_multiplier must be at least 1.0".into(),
            ));
        }
        Ok(())
    }

    pub fn monitor_config(&self) -> ReleaseMonitorConfig {
        ReleaseMonitorConfig {
            check_interval: Duration::from_secs(self.release.check_interval_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.pagination.default_page_size, 20);
        assert_eq!(config.fetch.max_attempts, 3);
        assert!(config.release.current_version.is_none());
    }

    #[test]
    fn sections_override_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [logging]
            level = "debug"
            format = "json"

            [pagination]
            default_page_size = 25

            [fetch]
            max_attempts = 5
            initial_delay = 50

            [release]
            current_version = "v0.27.1"
            source_path = "/tmp/release.json"
            check_interval_secs = 60
            "#,
        )
        .unwrap();

        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.pagination.default_page_size, 25);
        assert_eq!(config.pagination.max_page_size, 100);
        assert_eq!(config.fetch.max_attempts, 5);
        assert_eq!(config.fetch.initial_delay, Duration::from_millis(50));
        assert_eq!(config.fetch.max_delay, Duration::from_secs(5));
        assert_eq!(config.release.current_version, Some(Version::new(0, 27, 1)));
        assert_eq!(config.monitor_config().check_interval, Duration::from_secs(60));
    }

    #[test]
    fn bad_version_is_a_parse_error() {
        let err = AppConfig::from_toml_str("[release]\ncurrent_version = \"0.27\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn inconsistent_page_sizes_are_rejected() {
        let err = AppConfig::from_toml_str(
            "[pagination]\ndefault_page_size = 50\nmax_page_size = 10",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn missing_file_gives_defaults() {
        let config = AppConfig::load(Path::new("/nonexistent/netbird-dash/config.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn params_use_configured_bounds() {
        let pagination = PaginationConfig {
            default_page_size: 15,
            max_page_size: 50,
        };
        assert_eq!(pagination.params(None, None), PaginationParams::new(1, 15));
        assert_eq!(pagination.params(Some(0), Some(500)), PaginationParams::new(1, 50));
        assert_eq!(pagination.params(Some(3), Some(10)), PaginationParams::new(3, 10));
    }

    #[test]
    fn default_path_ends_with_app_dir() {
        assert!(default_config_path().ends_with("netbird-dash/config.toml"));
    }
}
