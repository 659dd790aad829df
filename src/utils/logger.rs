// Logger initialization
//
// The TUI owns the terminal, so it logs to a daily-rolling file. The
// headless report logs to stderr.

use crate::config::LoggingConfig;
use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FILE_PREFIX: &str = "sales-dashboard.log";
const DEFAULT_FILTER: &str = "sales_dashboard=info";

fn build_filter(directives: &str) -> EnvFilter {
    EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Log to `<directory>/sales-dashboard.log.<date>`. Keep the guard alive
/// until exit so buffered lines are flushed.
pub fn init_file_logger(config: &LoggingConfig) -> Result<WorkerGuard> {
    std::fs::create_dir_all(&config.directory)
        .with_context(|| format!("Failed to create log directory {}", config.directory.display()))?;

    let appender = tracing_appender::rolling::daily(&config.directory, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(build_filter(&config.filter))
        .with(tracing_subscriber::fmt::layer().with_writer(writer).with_ansi(false))
        .try_init()
        .context("Failed to install file logger")?;

    Ok(guard)
}

/// Log to stderr, leaving stdout for report output
pub fn init_stderr_logger(config: &LoggingConfig) -> Result<()> {
    tracing_subscriber::registry()
        .with(build_filter(&config.filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .context("Failed to install stderr logger")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_falls_back_on_bad_directives() {
        assert_eq!(build_filter("sales_dashboard=notalevel").to_string(), DEFAULT_FILTER);
        assert_eq!(build_filter("sales_dashboard=debug").to_string(), "sales_dashboard=debug");
    }
}
