//! Logging configuration module
//! Console logging plus an optional rolling JSON log file

use std::io;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FILE_NAME: &str = "blogstack.log";

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,             // fallback level when RUST_LOG is unset
    pub file_dir: Option<PathBuf>, // directory for the JSON log file
    pub rotation: LogRotation,
}

/// Log rotation policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogRotation {
    Hourly,
    Daily,
    Never,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_dir: None,
            rotation: LogRotation::Daily,
        }
    }
}

impl LoggingConfig {
    pub fn with_level(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            ..Default::default()
        }
    }

    /// Install the global subscriber.
    ///
    /// The returned guard flushes the file writer on drop and must be held
    /// for the lifetime of the process.
    pub fn init(&self) -> Result<Option<WorkerGuard>, Box<dyn std::error::Error + Send + Sync>> {
        let env_filter =
            EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&self.level))?;

        // stdout carries command output, so logs go to stderr
        let console_layer = fmt::layer()
            .with_target(true)
            .with_level(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .with_writer(io::stderr);

        let guard = if let Some(ref dir) = self.file_dir {
            let file_appender = match self.rotation {
                LogRotation::Hourly => rolling::hourly(dir, LOG_FILE_NAME),
                LogRotation::Daily => rolling::daily(dir, LOG_FILE_NAME),
                LogRotation::Never => rolling::never(dir, LOG_FILE_NAME),
            };
            let (writer, guard) = non_blocking(file_appender);

            let file_layer = fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_ansi(false)
                .json()
                .with_writer(writer);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(console_layer)
                .with(file_layer)
                .try_init()?;

            Some(guard)
        } else {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(console_layer)
                .try_init()?;

            None
        };

        tracing::debug!(level = %self.level, "Logging initialized");

        Ok(guard)
    }
}
