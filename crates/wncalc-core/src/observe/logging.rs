//! # Structured Logging
//!
//! Installs a global `tracing` subscriber with:
//!
//! - three output formats (JSON, Pretty, Compact)
//! - level filtering, with `RUST_LOG` taking precedence over the configured level
//! - output on stderr, leaving stdout to the calculation report
//!
//! ## Example
//!
//! ```rust,ignore
//! use wncalc_core::observe::{init_logging, LogConfig, LogFormat, LogLevel};
//!
//! let config = LogConfig {
//!     level: LogLevel::Debug,
//!     format: LogFormat::Json,
//!     ..Default::default()
//! };
//!
//! init_logging(&config);
//!
//! tracing::info!(scenario = "link_budget", "explanation received");
//! ```

use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log level configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level (most verbose)
    Trace,
    /// Debug level
    Debug,
    /// Info level
    Info,
    /// Warning level (default)
    Warn,
    /// Error level (least verbose)
    Error,
}

impl LogLevel {
    /// Level raised by `n` steps of verbosity, saturating at trace.
    pub fn more_verbose(self, n: u8) -> Self {
        let order = [
            LogLevel::Error,
            LogLevel::Warn,
            LogLevel::Info,
            LogLevel::Debug,
            LogLevel::Trace,
        ];
        let idx = order.iter().position(|l| *l == self).unwrap_or(1);
        order[(idx + usize::from(n)).min(order.len() - 1)]
    }
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Warn
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON format (machine-readable)
    Json,
    /// Pretty format (human-readable, multi-line)
    Pretty,
    /// Compact format (one line per event)
    Compact,
}

impl Default for LogFormat {
    fn default() -> Self {
        LogFormat::Compact
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Log level
    pub level: LogLevel,
    /// Output format
    pub format: LogFormat,
    /// Include source location (file:line)
    pub source_location: bool,
    /// Include thread names (explanation workers are named)
    pub thread_names: bool,
    /// Target filter (e.g., "wncalc_core=debug"), overrides `level`
    pub filter: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Warn,
            format: LogFormat::Compact,
            source_location: false,
            thread_names: false,
            filter: None,
        }
    }
}

impl LogConfig {
    /// Verbose, pretty, with source locations and thread names.
    pub fn development() -> Self {
        Self {
            level: LogLevel::Debug,
            format: LogFormat::Pretty,
            source_location: true,
            thread_names: true,
            ..Default::default()
        }
    }

    /// JSON at info level.
    pub fn production() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Json,
            ..Default::default()
        }
    }

    /// Errors only.
    pub fn quiet() -> Self {
        Self {
            level: LogLevel::Error,
            format: LogFormat::Compact,
            ..Default::default()
        }
    }

    fn env_filter(&self) -> EnvFilter {
        match self.filter {
            Some(ref custom) => {
                EnvFilter::try_new(custom).unwrap_or_else(|_| EnvFilter::new(self.level.to_string()))
            }
            None => EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(self.level.to_string())),
        }
    }
}

/// Initialize the global logging subscriber.
///
/// Call once at startup; later calls are ignored.
pub fn init_logging(config: &LogConfig) {
    let filter = config.env_filter();

    let result = match config.format {
        LogFormat::Json => {
            let subscriber = tracing_subscriber::registry().with(filter).with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_file(config.source_location)
                    .with_line_number(config.source_location)
                    .with_thread_names(config.thread_names),
            );
            tracing::subscriber::set_global_default(subscriber)
        }
        LogFormat::Pretty => {
            let subscriber = tracing_subscriber::registry().with(filter).with(
                fmt::layer()
                    .pretty()
                    .with_writer(std::io::stderr)
                    .with_file(config.source_location)
                    .with_line_number(config.source_location)
                    .with_thread_names(config.thread_names),
            );
            tracing::subscriber::set_global_default(subscriber)
        }
        LogFormat::Compact => {
            let subscriber = tracing_subscriber::registry().with(filter).with(
                fmt::layer()
                    .compact()
                    .with_writer(std::io::stderr)
                    .with_file(config.source_location)
                    .with_line_number(config.source_location)
                    .with_thread_names(config.thread_names),
            );
            tracing::subscriber::set_global_default(subscriber)
        }
    };

    // already initialized
    let _ = result;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_display() {
        assert_eq!(format!("{}", LogLevel::Debug), "debug");
        assert_eq!(format!("{}", LogLevel::Warn), "warn");
        assert_eq!(format!("{}", LogLevel::Error), "error");
    }

    #[test]
    fn test_more_verbose() {
        assert_eq!(LogLevel::Warn.more_verbose(0), LogLevel::Warn);
        assert_eq!(LogLevel::Warn.more_verbose(1), LogLevel::Info);
        assert_eq!(LogLevel::Warn.more_verbose(2), LogLevel::Debug);
        assert_eq!(LogLevel::Info.more_verbose(9), LogLevel::Trace);
    }

    #[test]
    fn test_config_presets() {
        let dev = LogConfig::development();
        assert_eq!(dev.level, LogLevel::Debug);
        assert_eq!(dev.format, LogFormat::Pretty);
        assert!(dev.source_location);

        let prod = LogConfig::production();
        assert_eq!(prod.level, LogLevel::Info);
        assert_eq!(prod.format, LogFormat::Json);

        assert_eq!(LogConfig::quiet().level, LogLevel::Error);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: LogConfig = serde_yaml::from_str("format: json").unwrap();
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.level, LogLevel::Warn);
        assert!(config.filter.is_none());
    }

    #[test]
    fn test_repeated_init_is_ignored() {
        init_logging(&LogConfig::quiet());
        init_logging(&LogConfig::development());
    }
}
