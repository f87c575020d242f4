// ABOUTME: Tracing subscriber setup driven by RUST_LOG, LOG_FORMAT and friends
// ABOUTME: AppLogger groups the structured events emitted for auth, backend and chat calls
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Structured logging configuration
//!
//! Log output goes to stderr so the CLI's stdout stays reserved for results.
//! The default level is `warn`; `--verbose` or `RUST_LOG` raise it.

use std::env;
use std::io;

use anyhow::Result;
use tracing::{debug, info, warn, Level};
use tracing_subscriber::{
    filter::Directive,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::constants::service_names;

/// HTTP stack crates that are only interesting when they fail
const QUIET_TARGETS: [&str; 5] = ["hyper", "hyper_util", "reqwest", "rustls", "h2"];

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One `JSON` object per line, for piping into a collector
    Json,
    /// Full human readable output with targets and thread names
    Pretty,
    /// Single-line output for interactive use
    #[default]
    Compact,
}

impl LogFormat {
    /// Parse the `LOG_FORMAT` value, falling back to compact
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Self::Json,
            "pretty" => Self::Pretty,
            _ => Self::Compact,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,
    /// Output format
    pub format: LogFormat,
    /// Print the source file and line of each event
    pub source_location: bool,
    /// Emit span open and close events
    pub span_events: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_owned(),
            format: LogFormat::Compact,
            source_location: false,
            span_events: false,
        }
    }
}

impl LoggingConfig {
    /// Read `RUST_LOG`, `LOG_FORMAT`, `LOG_INCLUDE_LOCATION` and `LOG_INCLUDE_SPANS`
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            level: env::var("RUST_LOG").unwrap_or(defaults.level),
            format: env::var("LOG_FORMAT").map_or(defaults.format, |v| LogFormat::parse(&v)),
            source_location: env::var("LOG_INCLUDE_LOCATION").is_ok(),
            span_events: env::var("LOG_INCLUDE_SPANS").is_ok(),
        }
    }

    fn filter(&self) -> EnvFilter {
        QUIET_TARGETS
            .iter()
            .map(|target| {
                format!("{target}=warn")
                    .parse::<Directive>()
                    .unwrap_or_else(|_| Level::WARN.into())
            })
            .fold(EnvFilter::new(&self.level), EnvFilter::add_directive)
    }

    fn fmt_span(&self) -> FmtSpan {
        if self.span_events {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }

    /// Install the global tracing subscriber
    ///
    /// # Errors
    ///
    /// Returns an error if a global subscriber is already installed
    pub fn init(&self) -> Result<()> {
        let registry = tracing_subscriber::registry().with(self.filter());
        let base = fmt::layer()
            .with_writer(io::stderr)
            .with_file(self.source_location)
            .with_line_number(self.source_location)
            .with_span_events(self.fmt_span());

        match self.format {
            LogFormat::Json => registry.with(base.json()).try_init()?,
            LogFormat::Pretty => registry.with(base.with_thread_names(true)).try_init()?,
            LogFormat::Compact => registry.with(base.compact().with_target(false)).try_init()?,
        }

        debug!(
            service.name = service_names::COOK_AI,
            service.version = env!("CARGO_PKG_VERSION"),
            log.level = %self.level,
            log.format = ?self.format,
            "Logging initialized"
        );
        Ok(())
    }
}

/// Structured events shared by the backend, auth and chat clients
pub struct AppLogger;

impl AppLogger {
    /// Sign-in, refresh and account changes; failures log at warn
    pub fn log_auth_event(subject: &str, event: &str, success: bool, details: Option<&str>) {
        let details = details.unwrap_or_default();
        if success {
            info!(auth.subject = %subject, auth.event = %event, "Authentication succeeded");
        } else {
            warn!(
                auth.subject = %subject,
                auth.event = %event,
                auth.details = %details,
                "Authentication failed"
            );
        }
    }

    /// Document backend calls, at debug level since subscriptions poll continuously
    pub fn log_backend_operation(operation: &str, path: &str, success: bool, duration_ms: u64) {
        debug!(
            backend.operation = %operation,
            backend.path = %path,
            backend.success = success,
            backend.duration_ms = duration_ms,
            "Backend operation"
        );
    }

    /// Chat completion calls
    pub fn log_chat_call(provider: &str, with_image: bool, success: bool, duration_ms: u64) {
        info!(
            chat.provider = %provider,
            chat.with_image = with_image,
            chat.success = success,
            chat.duration_ms = duration_ms,
            "Chat completion"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parsing() {
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse(" Pretty "), LogFormat::Pretty);
        assert_eq!(LogFormat::parse("anything"), LogFormat::Compact);
    }

    #[test]
    fn test_default_level_is_quiet() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "warn");
        assert_eq!(config.format, LogFormat::Compact);
        assert!(!config.source_location);
    }

    #[test]
    fn test_pretty_format_installs_once() {
        let config = LoggingConfig {
            level: "debug".to_owned(),
            format: LogFormat::Pretty,
            source_location: true,
            span_events: true,
        };
        assert!(config.init().is_ok());
        assert!(config.init().is_err());
    }
}
