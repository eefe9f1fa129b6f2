//! # Diagnostics
//!
//! Tracing subscriber setup for the binaries.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::DiagnosticsConfig;

/// Install the global tracing subscriber
///
/// Output goes to stdout, and additionally to a daily-rolling file named
/// after `file_name` when `config.log_dir` is set. `RUST_LOG` takes
/// precedence over the configured level.
///
/// Keep the returned guard alive for the life of the process, otherwise
/// buffered file output is lost.
///
/// # Panics
///
/// Panics if a global subscriber is already installed.
pub fn init(config: &DiagnosticsConfig, file_name: &str) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    let (file_layer, guard) = match &config.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .init();

    guard
}
