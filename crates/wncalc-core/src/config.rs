//! # Configuration
//!
//! YAML configuration for the `wncalc` tools:
//!
//! - Explanation service (endpoint, timeout, on/off)
//! - Logging (level, format, filter)
//! - Report output format
//!
//! ## Configuration Search Path
//!
//! Configuration is loaded from the first file found:
//! 1. Path specified via `WNCALC_CONFIG` environment variable
//! 2. `./wncalc.yaml` (current directory)
//! 3. `~/.config/wncalc/config.yaml` (user config)
//! 4. `/etc/wncalc/config.yaml` (system config)
//!
//! ## Example Configuration
//!
//! ```yaml
//! explain:
//!   enabled: true
//!   endpoint: "http://localhost:3000/api/explain"
//!   timeout_secs: 30
//!
//! logging:
//!   level: info
//!   format: json
//!
//! output:
//!   format: text
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::observe::LogConfig;

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV_VAR: &str = "WNCALC_CONFIG";

/// Explanation endpoint used when none is configured.
pub const DEFAULT_EXPLAIN_ENDPOINT: &str = "http://localhost:3000/api/explain";

/// Error type for configuration operations.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Configuration file not found
    NotFound(String),
    /// Failed to read or write configuration file
    ReadError(String),
    /// Failed to parse configuration
    ParseError(String),
    /// Invalid configuration value
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NotFound(msg) => write!(f, "config not found: {}", msg),
            ConfigError::ReadError(msg) => write!(f, "failed to read config: {}", msg),
            ConfigError::ParseError(msg) => write!(f, "failed to parse config: {}", msg),
            ConfigError::ValidationError(msg) => write!(f, "invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Explanation service configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplainConfig {
    /// Send explanation requests at all; when false only the offline summary is shown
    pub enabled: bool,
    /// POST endpoint accepting `{scenario, inputs, results}`
    pub endpoint: String,
    /// Round-trip bound in seconds
    pub timeout_secs: u64,
}

impl ExplainConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ExplainConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: DEFAULT_EXPLAIN_ENDPOINT.to_string(),
            timeout_secs: 30,
        }
    }
}

/// Report format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Labelled table with units
    Text,
    /// `{scenario, inputs, results}` object
    Json,
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Text
    }
}

/// Report output configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

/// Complete wncalc configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WncalcConfig {
    /// Explanation service
    pub explain: ExplainConfig,
    /// Logging
    pub logging: LogConfig,
    /// Report output
    pub output: OutputConfig,
}

impl WncalcConfig {
    /// Load configuration from the default search path.
    ///
    /// Search order:
    /// 1. `WNCALC_CONFIG` environment variable
    /// 2. `./wncalc.yaml`
    /// 3. `~/.config/wncalc/config.yaml`
    /// 4. `/etc/wncalc/config.yaml`
    ///
    /// Returns default config if no file is found. A `WNCALC_CONFIG` naming
    /// a missing file is an error.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let path = PathBuf::from(path);
            if !path.exists() {
                return Err(ConfigError::NotFound(format!(
                    "{} set to {}",
                    CONFIG_ENV_VAR,
                    path.display()
                )));
            }
            return Self::load_from(&path);
        }

        for path in Self::config_search_paths() {
            if path.exists() {
                tracing::debug!(path = %path.display(), "loading config");
                return Self::load_from(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load and validate configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(format!("{}: {}", path.display(), e)))?;

        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content =
            serde_yaml::to_string(self).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        std::fs::write(path, content)
            .map_err(|e| ConfigError::ReadError(format!("{}: {}", path.display(), e)))
    }

    /// Get configuration search paths.
    pub fn config_search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("./wncalc.yaml")];

        if let Some(config_dir) = directories::ProjectDirs::from("", "", "wncalc") {
            paths.push(config_dir.config_dir().join("config.yaml"));
        }

        paths.push(PathBuf::from("/etc/wncalc/config.yaml"));

        paths
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.explain.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "explain.timeout_secs must be > 0".to_string(),
            ));
        }

        let endpoint = self.explain.endpoint.trim();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(ConfigError::ValidationError(format!(
                "explain.endpoint must be an http(s) URL, got '{}'",
                self.explain.endpoint
            )));
        }

        Ok(())
    }

    /// Generate example configuration YAML.
    pub fn example_yaml() -> String {
        let config = Self {
            logging: LogConfig {
                filter: Some("wncalc_core=info".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };

        serde_yaml::to_string(&config).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observe::{LogFormat, LogLevel};

    #[test]
    fn test_default_config() {
        let config = WncalcConfig::default();
        assert!(config.explain.enabled);
        assert_eq!(config.explain.endpoint, "http://localhost:3000/api/explain");
        assert_eq!(config.explain.timeout(), Duration::from_secs(30));
        assert_eq!(config.output.format, OutputFormat::Text);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
explain:
  endpoint: "https://calc.example.net/api/explain"
  timeout_secs: 5

logging:
  level: debug
  format: json

output:
  format: json
"#;

        let config = WncalcConfig::parse(yaml).unwrap();
        assert_eq!(config.explain.endpoint, "https://calc.example.net/api/explain");
        assert_eq!(config.explain.timeout_secs, 5);
        assert!(config.explain.enabled);
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.output.format, OutputFormat::Json);
    }

    #[test]
    fn test_parse_partial_yaml() {
        let config = WncalcConfig::parse("explain:\n  enabled: false\n").unwrap();
        assert!(!config.explain.enabled);
        assert_eq!(config.explain.timeout_secs, 30);
        assert_eq!(config.logging, LogConfig::default());
    }

    #[test]
    fn test_parse_error() {
        let err = WncalcConfig::parse("explain: [1, 2").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_validation() {
        let mut config = WncalcConfig::default();
        config.explain.timeout_secs = 0;
        assert!(matches!(config.validate(), Err(ConfigError::ValidationError(_))));

        config.explain.timeout_secs = 10;
        config.explain.endpoint = "localhost:3000".to_string();
        assert!(config.validate().is_err());

        config.explain.endpoint = "https://localhost/api/explain".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wncalc.yaml");

        let mut config = WncalcConfig::default();
        config.explain.timeout_secs = 12;
        config.output.format = OutputFormat::Json;
        config.save(&path).unwrap();

        let loaded = WncalcConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_from_rejects_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "explain:\n  timeout_secs: 0\n").unwrap();
        assert!(matches!(
            WncalcConfig::load_from(&path),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_load_from_missing_file() {
        let err = WncalcConfig::load_from(Path::new("/nonexistent/wncalc.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError(_)));
    }

    #[test]
    fn test_example_yaml() {
        let yaml = WncalcConfig::example_yaml();
        assert!(yaml.contains("explain:"));
        assert!(yaml.contains("logging:"));
        let parsed = WncalcConfig::parse(&yaml).unwrap();
        assert!(parsed.validate().is_ok());
    }

    #[test]
    fn test_config_search_paths() {
        let paths = WncalcConfig::config_search_paths();
        assert!(paths[0].ends_with("wncalc.yaml"));
        assert!(paths.last().unwrap().starts_with("/etc/wncalc"));
    }
}
