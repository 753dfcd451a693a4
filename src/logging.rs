// ABOUTME: Logging configuration and structured logging setup
// ABOUTME: Configures log level and output format from the environment
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2026 withings-metrics contributors

//! Logging setup with structured output.

use anyhow::{anyhow, Result};
use std::env;
use tracing_subscriber::EnvFilter;

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level used when `RUST_LOG` is unset (trace, debug, info, warn,
    /// error).
    pub level: String,
    /// Output format.
    pub format: LogFormat,
}

/// Log output format options.
#[derive(Debug, Clone)]
pub enum LogFormat {
    /// `JSON` format for machine-readable logging.
    Json,
    /// Pretty format for interactive use.
    Pretty,
    /// Compact format for space-constrained environments.
    Compact,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: LogFormat::Pretty,
        }
    }
}

impl LoggingConfig {
    /// Build a configuration from `LOG_LEVEL` and `LOG_FORMAT`, defaulting
    /// to pretty output at info level.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let level = env::var("LOG_LEVEL").unwrap_or(defaults.level);
        let format = match env::var("LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            Ok("compact") => LogFormat::Compact,
            _ => LogFormat::Pretty,
        };
        Self { level, format }
    }
}

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level, matching the
/// usual tracing-subscriber behavior.
///
/// # Errors
///
/// Returns an error when a global subscriber is already installed.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match config.format {
        LogFormat::Json => builder
            .json()
            .try_init()
            .map_err(|err| anyhow!("failed to initialize logging: {err}"))?,
        LogFormat::Pretty => builder
            .try_init()
            .map_err(|err| anyhow!("failed to initialize logging: {err}"))?,
        LogFormat::Compact => builder
            .compact()
            .try_init()
            .map_err(|err| anyhow!("failed to initialize logging: {err}"))?,
    }
    Ok(())
}

/// Initialize logging entirely from the environment.
///
/// # Errors
///
/// Returns an error when a global subscriber is already installed.
pub fn init_from_env() -> Result<()> {
    init(&LoggingConfig::from_env())
}
