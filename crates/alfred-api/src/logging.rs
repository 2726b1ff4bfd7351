//! Logging configuration for Alfred
//!
//! The engine emits `tracing` events (parse decisions at `debug`, per-record
//! filter rejections and generated SQL at `trace`, undecodable query strings
//! at `warn`). Applications that already install a subscriber can ignore
//! this module; others can use [`LogConfig`] to get one quickly.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log output destination
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogOutput {
    /// Output to stdout
    Stdout,
    /// Output to a daily rotated file
    File(PathBuf),
    /// Output to both stdout and file
    Both(PathBuf),
}

/// Log format style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogFormat {
    /// Human-readable multi-line format
    Pretty,
    /// Compact single-line format
    Compact,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Filter directive, e.g. `info` or `alfred_core=trace`
    pub level: String,
    /// Output destination
    pub output: LogOutput,
    /// Format style
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            output: LogOutput::Stdout,
            format: LogFormat::Compact,
        }
    }
}

impl LogConfig {
    /// Config with info level and stdout output
    pub fn info() -> Self {
        Self::default()
    }

    /// Config with debug level, which shows every parsed query option
    pub fn debug() -> Self {
        Self::default().with_level("debug")
    }

    /// Config tracing the engine itself, down to each rejected record
    pub fn trace_engine() -> Self {
        Self::default().with_level("info,alfred_core=trace")
    }

    /// Set log output to a rotated file
    pub fn with_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.output = LogOutput::File(path.into());
        self
    }

    /// Set log output to both stdout and a rotated file
    pub fn with_both<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.output = LogOutput::Both(path.into());
        self
    }

    /// Set log format
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the filter directive
    pub fn with_level<S: Into<String>>(mut self, level: S) -> Self {
        self.level = level.into();
        self
    }

    /// Install the global subscriber.
    ///
    /// `RUST_LOG` takes precedence over [`LogConfig::level`]. For file output
    /// the returned guard must be kept alive; dropping it stops the writer
    /// thread. Fails if the directive is invalid or a global subscriber is
    /// already installed.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use alfred::logging::LogConfig;
    ///
    /// let _guard = LogConfig::debug().init()?;
    /// # Ok::<(), alfred::Error>(())
    /// ```
    pub fn init(self) -> Result<Option<WorkerGuard>> {
        let env_filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.level))
            .map_err(|e| Error::InvalidConfig(format!("log level '{}': {}", self.level, e)))?;
        let registry = tracing_subscriber::registry().with(env_filter);

        let (installed, guard) = match (&self.output, self.format) {
            (LogOutput::Stdout, LogFormat::Pretty) => {
                (registry.with(fmt::layer().pretty()).try_init(), None)
            }
            (LogOutput::Stdout, LogFormat::Compact) => {
                (registry.with(fmt::layer().compact()).try_init(), None)
            }
            (LogOutput::File(path), LogFormat::Pretty) => {
                let (writer, guard) = file_writer(path);
                let layer = fmt::layer().with_writer(writer).with_ansi(false).pretty();
                (registry.with(layer).try_init(), Some(guard))
            }
            (LogOutput::File(path), LogFormat::Compact) => {
                let (writer, guard) = file_writer(path);
                let layer = fmt::layer().with_writer(writer).with_ansi(false).compact();
                (registry.with(layer).try_init(), Some(guard))
            }
            (LogOutput::Both(path), _) => {
                let (writer, guard) = file_writer(path);
                let installed = registry
                    .with(fmt::layer().compact())
                    .with(fmt::layer().with_writer(writer).with_ansi(false).compact())
                    .try_init();
                (installed, Some(guard))
            }
        };

        installed.map_err(|e| Error::InvalidConfig(format!("logging already initialized: {}", e)))?;
        Ok(guard)
    }
}

fn file_writer(path: &Path) -> (tracing_appender::non_blocking::NonBlocking, WorkerGuard) {
    let directory = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("alfred.log");
    let appender = tracing_appender::rolling::daily(directory, file_name);
    tracing_appender::non_blocking(appender)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_config_defaults() {
        let config = LogConfig::default();
        assert_eq!(config.level, "info");
        assert_eq!(config.output, LogOutput::Stdout);
    }

    #[test]
    fn test_log_config_builders() {
        let config = LogConfig::debug()
            .with_file("/tmp/alfred.log")
            .with_format(LogFormat::Pretty);
        assert_eq!(config.level, "debug");
        assert!(matches!(config.output, LogOutput::File(_)));
        assert_eq!(config.format, LogFormat::Pretty);
    }

    #[test]
    fn test_trace_engine_directive() {
        assert_eq!(LogConfig::trace_engine().level, "info,alfred_core=trace");
    }
}
