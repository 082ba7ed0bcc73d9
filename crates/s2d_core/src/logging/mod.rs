//! Logging setup for Sports2D settings front ends.
//!
//! The core only emits `tracing` events. Front ends call one of the
//! initializers here once at startup:
//! - `init_tracing`: stderr output, `RUST_LOG` wins over the given level
//! - `init_tracing_with_file`: the same plus a plain-text log file
//!
//! # Example
//!
//! ```no_run
//! use s2d_core::logging::{init_tracing_with_file, LogLevel};
//!
//! // Keep the guard alive until exit so buffered lines are flushed
//! let _guard = init_tracing_with_file(LogLevel::Debug, "/tmp/sports2d-logs").unwrap();
//! tracing::info!("ready");
//! ```

mod types;

use std::fs;
use std::io;
use std::path::Path;

pub use tracing_appender::non_blocking::WorkerGuard;
pub use types::LogLevel;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// File name used inside the log directory.
pub const LOG_FILE_NAME: &str = "s2d-settings.log";

/// Initialize global tracing subscriber for application-wide logging.
///
/// This sets up a subscriber that:
/// - Respects RUST_LOG environment variable
/// - Falls back to the provided default level
/// - Outputs to stderr
///
/// Should be called once at application startup.
pub fn init_tracing(default_level: LogLevel) {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_target(true))
        .with(env_filter(default_level))
        .init();
}

/// Like `init_tracing`, but also appends to `<log_dir>/s2d-settings.log`.
///
/// File writes happen on a background thread; the returned guard flushes
/// it when dropped.
pub fn init_tracing_with_file(
    default_level: LogLevel,
    log_dir: impl AsRef<Path>,
) -> io::Result<WorkerGuard> {
    let log_dir = log_dir.as_ref();
    fs::create_dir_all(log_dir)?;

    let appender = tracing_appender::rolling::never(log_dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_target(true))
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(env_filter(default_level))
        .init();

    Ok(guard)
}

/// Initialize tracing for tests (only logs warnings and above).
#[cfg(test)]
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}

fn env_filter(default_level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_to_filter_str(default_level)))
}

/// Convert LogLevel to filter string.
fn level_to_filter_str(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Trace => "trace",
        LogLevel::Debug => "debug",
        LogLevel::Info => "info",
        LogLevel::Warn => "warn",
        LogLevel::Error => "error",
    }
}
