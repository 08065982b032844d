//! Synchronization configuration types

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::source::CorrectionTable;

/// Errors that can occur while loading or validating configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("IO error with {path}: {message}")]
    Io { path: PathBuf, message: String },

    /// Config file is not valid TOML for this schema
    #[error("Failed to parse config: {0}")]
    Parse(String),

    /// A value is out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    /// Get a user-friendly error message for CLI output
    pub fn user_message(&self) -> String {
        match self {
            ConfigError::Io { path, .. } => {
                format!("{self}\n\nHint: Check that '{}' exists and is readable.", path.display())
            }
            ConfigError::Parse(_) | ConfigError::Invalid(_) => {
                format!("{self}\n\nHint: Fix the config file or remove it to use the defaults.")
            }
        }
    }
}

/// Main synchronization configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Remote country list
    pub source: SourceConfig,
    /// Connectivity check run before each fetch
    pub probe: ProbeConfig,
    /// Cache database path
    pub database: PathBuf,
    /// Fixes applied to fetched records
    pub corrections: CorrectionTable,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            probe: ProbeConfig::default(),
            database: PathBuf::from("db").join("countries.duckdb"),
            corrections: CorrectionTable::default(),
        }
    }
}

impl SyncConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load and validate a TOML config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config = Self::from_toml_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the database path
    pub fn with_database(mut self, path: impl Into<PathBuf>) -> Self {
        self.database = path.into();
        self
    }

    /// Set the source base URL
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.source.base_url = url.into();
        self
    }

    /// Set the source resource path
    pub fn with_resource_path(mut self, path: impl Into<String>) -> Self {
        self.source.resource_path = path.into();
        self
    }

    /// Set the probe URL
    pub fn with_probe_url(mut self, url: impl Into<String>) -> Self {
        self.probe.url = url.into();
        self
    }

    /// Set the correction table
    pub fn with_corrections(mut self, corrections: CorrectionTable) -> Self {
        self.corrections = corrections;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("source.base_url is empty".to_string()));
        }
        if !self.source.resource_path.starts_with('/') {
            return Err(ConfigError::Invalid(format!(
                "source.resource_path must start with '/': {}",
                self.source.resource_path
            )));
        }
        if self.source.timeout_secs == 0 {
            return Err(ConfigError::Invalid("source.timeout_secs must be positive".to_string()));
        }
        if self.probe.url.trim().is_empty() {
            return Err(ConfigError::Invalid("probe.url is empty".to_string()));
        }
        if self.probe.timeout_secs == 0 {
            return Err(ConfigError::Invalid("probe.timeout_secs must be positive".to_string()));
        }
        if self.database.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("database path is empty".to_string()));
        }
        Ok(())
    }
}

/// Remote source settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub base_url: String,
    pub resource_path: String,
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://restcountries.com".to_string(),
            resource_path: "/v2/all".to_string(),
            timeout_secs: 30,
        }
    }
}

impl SourceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Reachability probe settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    pub url: String,
    pub timeout_secs: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            url: "http://clients3.google.com/generate_204".to_string(),
            timeout_secs: 5,
        }
    }
}

impl ProbeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_are_valid() {
        let config = SyncConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.source.resource_path, "/v2/all");
        assert_eq!(config.database, PathBuf::from("db/countries.duckdb"));
        assert_eq!(config.corrections.overrides.len(), 3);
        assert_eq!(config.corrections.drops.len(), 7);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = SyncConfig::from_toml_str(
            r#"
            database = "cache/c.duckdb"

            [source]
            base_url = "http://localhost:8080"

            [[corrections.drops]]
            country = "VGB"
            currency = "[D]"
            "#,
        )
        .unwrap();

        assert_eq!(config.source.base_url, "http://localhost:8080");
        assert_eq!(config.source.timeout_secs, 30);
        assert_eq!(config.probe, ProbeConfig::default());
        assert_eq!(config.database, PathBuf::from("cache/c.duckdb"));
        assert_eq!(config.corrections.drops.len(), 1);
        assert_eq!(config.corrections.overrides.len(), 3);

        let config = SyncConfig::from_toml_str("[corrections]\noverrides = []\n").unwrap();
        assert_eq!(config.corrections.drops.len(), 7);
        assert!(config.corrections.overrides.is_empty());

        let config =
            SyncConfig::from_toml_str("[corrections]\ndrops = []\noverrides = []\n").unwrap();
        assert!(config.corrections.is_empty());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(SyncConfig::new().with_base_url("").validate().is_err());
        assert!(SyncConfig::new().with_resource_path("v2/all").validate().is_err());
        assert!(SyncConfig::new().with_database("").validate().is_err());

        assert!(SyncConfig::new().with_probe_url(" ").validate().is_err());
        assert!(SyncConfig::new().with_probe_url("http://localhost:9/").validate().is_ok());

        let mut config = SyncConfig::new();
        config.probe.timeout_secs = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("country-sync.toml");
        std::fs::write(&path, "[probe]\ntimeout_secs = 2\n").unwrap();

        let config = SyncConfig::load(&path).unwrap();
        assert_eq!(config.probe.timeout(), Duration::from_secs(2));

        let missing = SyncConfig::load(dir.path().join("missing.toml"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));

        std::fs::write(&path, "database = 5").unwrap();
        assert!(matches!(SyncConfig::load(&path), Err(ConfigError::Parse(_))));
    }
}
