//! Log setup
//!
//! Logs to the console, and to daily rotating files when a log directory is
//! configured.

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize logging. Keep the returned guard alive until exit so buffered
/// file output is flushed.
pub fn init_logging(log_dir: Option<&str>) -> anyhow::Result<Option<WorkerGuard>> {
    // Environment filter - default to INFO, can be overridden with RUST_LOG
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,fractal_tree=debug"));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true);

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let log_path = Path::new(dir);
            if !log_path.exists() {
                std::fs::create_dir_all(log_path)?;
            }

            // Files are named fractal_tree.log.YYYY-MM-DD
            let file_appender = RollingFileAppender::new(Rotation::DAILY, dir, "fractal_tree.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            let layer = fmt::layer()
                .with_writer(non_blocking)
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    match log_dir {
        Some(dir) => tracing::info!("Logging initialized. Log directory: {}", dir),
        None => tracing::debug!("Logging initialized (console only)"),
    }
    Ok(guard)
}
