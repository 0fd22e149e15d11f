//! # Observability
//!
//! Structured logging for the calculators and the explanation client via
//! `tracing`. Validation rejections and stale explanation completions log at
//! `debug`, enum fallbacks at `warn`, explanation round trips at `info`.
//!
//! ```rust,ignore
//! use wncalc_core::observe::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::default());
//! tracing::info!(scenario = "ofdm", "calculation complete");
//! ```

pub mod logging;

pub use logging::{init_logging, LogConfig, LogFormat, LogLevel};
