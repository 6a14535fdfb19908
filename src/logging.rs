//! Console and rolling-file logging
//!
//! Console output goes to stderr so `ranks` and `list` tables on stdout stay
//! clean. The file log under the log directory always records debug detail.

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const LOG_FILE: &str = "numeral_order.log";

/// Console filter used when `RUST_LOG` is unset
pub fn console_filter(verbose: bool) -> &'static str {
    if verbose {
        "info,numeral_order=debug"
    } else {
        "warn,numeral_order=info"
    }
}

/// Install the subscriber. Keep the returned guard alive until exit so
/// buffered file lines are flushed.
pub fn init_logging(log_dir: &str, verbose: bool) -> Option<WorkerGuard> {
    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .with_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(console_filter(verbose))),
        );

    if let Err(e) = std::fs::create_dir_all(Path::new(log_dir)) {
        // No file log; the console still works
        tracing_subscriber::registry().with(console).init();
        tracing::warn!("Failed to create log directory {}: {}", log_dir, e);
        return None;
    }

    // Rotates daily: numeral_order.log.YYYY-MM-DD
    let (writer, guard) =
        tracing_appender::non_blocking(RollingFileAppender::new(Rotation::DAILY, log_dir, LOG_FILE));
    let file = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_filter(EnvFilter::new("info,numeral_order=debug"));

    tracing_subscriber::registry().with(console).with(file).init();
    tracing::debug!("Logging to {}/{}", log_dir, LOG_FILE);
    Some(guard)
}
