//! Logging bootstrap
//!
//! The libraries only emit `tracing` events; binaries and tests call
//! [`init_logging`] once to install a subscriber with a console layer and an
//! optional daily-rolling file layer.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan, MakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

use crate::error::{Error, Result};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

const FALLBACK_LEVEL: &str = "info";

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Filter directive (`info`, `debug`, `ecl_keyword=trace,info`, ...)
    pub level: String,
    /// Enable console output
    pub console: bool,
    /// Log file path; the file name is used as the rolling file prefix
    pub file: Option<PathBuf>,
    pub format: LogFormat,
    /// Enable ANSI colors in console output
    pub ansi: bool,
    /// Include span open/close events
    pub span_events: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
    Compact,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: FALLBACK_LEVEL.to_string(),
            console: true,
            file: None,
            format: LogFormat::Pretty,
            ansi: true,
            span_events: false,
        }
    }
}

/// Build the event filter for `level`, falling back to `info` when the
/// directive does not parse
pub fn build_filter(level: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(level)
        .or_else(|_| EnvFilter::try_new(FALLBACK_LEVEL))
        .map_err(|e| Error::logging(format!("Invalid log level: {}", e)))
}

fn format_layer<W>(format: LogFormat, writer: W, ansi: bool, span_events: bool) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let span_events = if span_events {
        FmtSpan::FULL
    } else {
        FmtSpan::NONE
    };
    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(true)
        .with_span_events(span_events);

    match format {
        LogFormat::Json => layer
            .json()
            .with_thread_ids(true)
            .with_thread_names(true)
            .boxed(),
        LogFormat::Pretty => layer
            .pretty()
            .with_thread_ids(true)
            .with_thread_names(true)
            .boxed(),
        LogFormat::Compact => layer.compact().boxed(),
    }
}

/// Split a log file path into its directory and rolling file prefix
fn file_target(path: &Path) -> (PathBuf, String) {
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let prefix = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("ecl.log")
        .to_string();
    (directory, prefix)
}

/// Initialize logging with the given configuration
///
/// Returns a guard that must be kept alive for file logging to flush.
/// Fails if a global subscriber is already installed.
pub fn init_logging(config: &LogConfig) -> Result<Option<WorkerGuard>> {
    let mut layers: Vec<BoxedLayer> = Vec::new();
    let mut guard = None;

    if config.console {
        let layer = format_layer(
            config.format,
            std::io::stdout,
            config.ansi,
            config.span_events,
        );
        layers.push(layer.with_filter(build_filter(&config.level)?).boxed());
    }

    if let Some(path) = &config.file {
        let (directory, prefix) = file_target(path);
        std::fs::create_dir_all(&directory)?;

        let appender = tracing_appender::rolling::daily(&directory, &prefix);
        let (non_blocking, file_guard) = tracing_appender::non_blocking(appender);
        guard = Some(file_guard);

        let layer = format_layer(config.format, non_blocking, false, config.span_events);
        layers.push(layer.with_filter(build_filter(&config.level)?).boxed());
    }

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|e| Error::logging(format!("Failed to initialize logging: {}", e)))?;

    Ok(guard)
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LogConfig::default();
        assert_eq!(config.level, "info");
        assert!(config.console);
        assert!(config.file.is_none());
        assert_eq!(config.format, LogFormat::Pretty);
    }

    #[test]
    fn test_build_filter() {
        assert_eq!(build_filter("debug").unwrap().to_string(), "debug");
        let filter = build_filter("ecl_keyword=trace,warn").unwrap().to_string();
        assert!(filter.contains("ecl_keyword=trace"));
        // Unparseable directives fall back to info
        assert_eq!(build_filter("ecl_keyword=loud").unwrap().to_string(), "info");
    }

    #[test]
    fn test_file_target() {
        let (dir, prefix) = file_target(Path::new("logs/codec.log"));
        assert_eq!(dir, PathBuf::from("logs"));
        assert_eq!(prefix, "codec.log");

        let (dir, prefix) = file_target(Path::new("codec.log"));
        assert_eq!(dir, PathBuf::from("."));
        assert_eq!(prefix, "codec.log");
    }

    #[test]
    fn test_format_serde() {
        let config: LogConfig =
            serde_json::from_str(r#"{"level":"debug","format":"json","file":"out/app.log"}"#)
                .unwrap();
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.file, Some(PathBuf::from("out/app.log")));
        assert!(config.console);
    }
}
