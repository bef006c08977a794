//! File logging for waypoint
//!
//! Log lines go to `$XDG_STATE_HOME/waypoint/`, one file per UTC day named
//! `waypoint.log.YYYY-MM-DD`. Stdout is left to command output.

use std::path::PathBuf;

use chrono::{NaiveDate, Utc};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::{Config, LoggingConfig};
use crate::error::{Error, Result};

const LOG_FILE_PREFIX: &str = "waypoint.log";

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over `logging.level`. At most
/// `logging.max_files` daily files are kept.
pub fn init(config: &LoggingConfig) -> Result<LoggingGuard> {
    let (writer, guard) = daily_writer(config.max_files)?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    tracing::info!(
        log_file = %log_file_path(Utc::now().date_naive()).display(),
        level = %config.level,
        max_files = config.max_files,
        "Logging initialized"
    );

    Ok(LoggingGuard { _guard: guard })
}

fn daily_writer(max_files: usize) -> Result<(NonBlocking, WorkerGuard)> {
    let dir = log_dir();
    std::fs::create_dir_all(&dir)?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .max_log_files(max_files.max(1))
        .build(&dir)
        .map_err(|e| {
            Error::Config(format!("failed to open log file in {}: {}", dir.display(), e))
        })?;
    Ok(tracing_appender::non_blocking(appender))
}

/// Route logs to the test harness's captured output.
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .with_span_events(FmtSpan::CLOSE)
        .try_init();
}

/// Flushes buffered log lines when dropped
pub struct LoggingGuard {
    _guard: WorkerGuard,
}

/// Directory holding the daily log files
pub fn log_dir() -> PathBuf {
    Config::state_dir()
}

/// The file written on `date` (a UTC calendar day).
pub fn log_file_path(date: NaiveDate) -> PathBuf {
    log_dir().join(format!("{}.{}", LOG_FILE_PREFIX, date.format("%Y-%m-%d")))
}
