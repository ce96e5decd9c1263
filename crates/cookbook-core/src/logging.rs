//! File logging for the CLI.
//!
//! Events go to `<home>/logs/cookbook.log` through a non-blocking writer so
//! stdout stays reserved for command output.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{Config, paths};

/// Env var holding a tracing filter; wins over `log_filter` in the config.
pub const LOG_ENV: &str = "COOKBOOK_LOG";

/// Log file name inside the logs directory.
pub const LOG_FILE: &str = "cookbook.log";

/// Builds the filter from `COOKBOOK_LOG` or the configured default.
///
/// # Errors
/// Returns an error if the directive string does not parse.
pub fn build_filter(env_value: Option<&str>, config_filter: &str) -> Result<EnvFilter> {
    let directives = env_value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(config_filter);
    EnvFilter::try_new(directives)
        .with_context(|| format!("Invalid tracing filter '{directives}'"))
}

/// Installs the global subscriber writing to the default logs directory.
///
/// Keep the returned guard alive for the process lifetime; dropping it
/// flushes and stops the writer.
///
/// # Errors
/// Returns an error if the logs directory cannot be created, the filter is
/// invalid, or a global subscriber is already set.
pub fn init(config: &Config) -> Result<WorkerGuard> {
    init_in(&paths::logs_dir(), config)
}

/// Same as [`init`] with an explicit logs directory.
///
/// # Errors
/// See [`init`].
pub fn init_in(dir: &Path, config: &Config) -> Result<WorkerGuard> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let env_value = std::env::var(LOG_ENV).ok();
    let filter = build_filter(env_value.as_deref(), &config.log_filter)?;

    let appender = tracing_appender::rolling::never(dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(writer),
        )
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}
