//! # Logging
//!
//! Installs the global `tracing` subscriber: human readable console output,
//! plus an optional JSON log file rotated daily.

use std::io;
use std::path::Path;

use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// How many rotated log files are kept on disk.
pub const MAX_LOG_FILES: usize = 7;

/// Sets up logging for the process.
///
/// The filter comes from `RUST_LOG` when set, otherwise from `log_level`.
/// When `log_dir` is given, JSON records are also written to
/// `<log_dir>/<app_name>.<date>.log`.
///
/// # Returns
/// The file writer's guard. Keep it alive until exit so buffered lines are
/// flushed; it is `None` when file logging is off.
pub fn setup_tracing(
    app_name: &str,
    log_dir: Option<&Path>,
    log_level: &str,
) -> io::Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;

    let console_layer = fmt::layer().with_target(true).with_ansi(true);

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix(app_name)
                .filename_suffix("log")
                .max_log_files(MAX_LOG_FILES)
                .build(dir)
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer).json();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::AlreadyExists, e.to_string()))?;

    info!("Logging initialized with level: {}", log_level);
    Ok(guard)
}
