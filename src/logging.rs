//! File-based logging for hosts embedding the skin engine
//!
//! The widget lives inside someone else's process, so nothing is written to
//! stdout; events go to a daily-rotating file instead.

use anyhow::anyhow;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::LogConfig;

const DEFAULT_FILTER: &str = "player_skin=debug,warn";

/// Initialize the logging system.
///
/// Logs are written to `<directory>/<file_prefix>.YYYY-MM-DD` with daily
/// rotation. `RUST_LOG` takes precedence over the configured filter.
///
/// Fails if a global subscriber is already installed.
pub fn init_logging(config: &LogConfig) -> anyhow::Result<()> {
    if !config.directory.exists() {
        std::fs::create_dir_all(&config.directory)?;
    }

    let file_appender =
        RollingFileAppender::new(Rotation::DAILY, &config.directory, &config.file_prefix);

    // Non-blocking so a slow disk never stalls the UI thread
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(config.filter.as_deref().unwrap_or(DEFAULT_FILTER))
    });

    let fmt_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_span_events(FmtSpan::CLOSE);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow!("Failed to install log subscriber: {}", e))?;

    // The writer must outlive every log call for the rest of the process
    Box::leak(Box::new(guard));

    tracing::info!("Logging initialized - logs written to {}/", config.directory.display());

    Ok(())
}
