//! Application logging functionality
//!
//! Installs the tracing subscriber and manages the debug log file under
//! ~/.config/cp-font-gen/logs/

pub mod run_log;

pub use run_log::{GenerationLog, LogEntry, RunLog, Status};

use crate::config::Verbosity;
use crate::core::config_file::ToolConfig;
use std::fs;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_FILE_PREFIX: &str = "cp-font-gen.log";

/// Get the path to the logs directory
pub fn logs_dir() -> PathBuf {
    ToolConfig::config_dir().join("logs")
}

/// Get the path to today's log file
pub fn current_log_file() -> PathBuf {
    let timestamp = chrono::Utc::now().format("%Y-%m-%d");
    logs_dir().join(format!("{LOG_FILE_PREFIX}.{timestamp}"))
}

/// Filter directive for a verbosity level
pub fn filter_directive(verbosity: Verbosity) -> &'static str {
    match verbosity {
        Verbosity::Default => "error",
        Verbosity::Verbose => "info",
        Verbosity::Debug => "debug",
    }
}

/// Install the global subscriber
///
/// `RUST_LOG` overrides the level derived from `verbosity`. In debug mode
/// events are also appended to a daily file in [`logs_dir`]; the returned
/// guard must stay alive until the process exits so the file gets flushed.
pub fn init(verbosity: Verbosity) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(verbosity)));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .compact();

    let (file_layer, guard) = if verbosity.is_debug() {
        match fs::create_dir_all(logs_dir()) {
            Ok(()) => {
                let appender = tracing_appender::rolling::daily(logs_dir(), LOG_FILE_PREFIX);
                let (writer, guard) = tracing_appender::non_blocking(appender);
                let layer = fmt::layer().with_writer(writer).with_ansi(false);
                (Some(layer), Some(guard))
            }
            Err(e) => {
                eprintln!("Failed to create logs directory {:?}: {}", logs_dir(), e);
                (None, None)
            }
        }
    } else {
        (None, None)
    };

    // A subscriber may already be installed (tests, repeated init)
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init();

    if guard.is_some() {
        tracing::debug!("Debug log file: {:?}", current_log_file());
    }
    guard
}
