//! Logging setup shared by scoutflow binaries.
//!
//! Every event goes to a size-capped file under `<home>/logs`. Stderr gets
//! the same events unless the command is producing machine-readable output,
//! in which case only warnings reach it. `RUST_LOG` overrides the defaults.

pub mod paths;
pub mod rolling;

use anyhow::{Context, Result};
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub use paths::{ensure_logs_dir, logs_dir, scoutflow_home, HOME_ENV};
pub use rolling::{RollingFile, RotationPolicy};

const DEFAULT_LOG_FILTER: &str = "scoutflow=info,scoutflow_ingest=info,scoutflow_store=info";

pub struct LogConfig<'a> {
    pub app_name: &'a str,
    /// Debug-level console output.
    pub verbose: bool,
    /// Warnings only on stderr, so stdout stays machine-readable.
    pub quiet_console: bool,
}

impl LogConfig<'_> {
    fn console_directive(&self) -> Option<&'static str> {
        if self.verbose {
            Some("debug")
        } else if self.quiet_console {
            Some("warn")
        } else {
            None
        }
    }
}

fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(config: LogConfig<'_>) -> Result<()> {
    let dir = ensure_logs_dir().context("Failed to create logs directory")?;
    let log_file = RollingFile::open(&dir, config.app_name, RotationPolicy::default())
        .with_context(|| format!("Failed to open log file in {}", dir.display()))?;

    let console_filter = match config.console_directive() {
        Some(directive) => EnvFilter::new(directive),
        None => default_filter(),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(log_file))
                .with_ansi(false)
                .with_filter(default_filter()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(console_filter),
        )
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(verbose: bool, quiet_console: bool) -> LogConfig<'static> {
        LogConfig {
            app_name: "scoutflow",
            verbose,
            quiet_console,
        }
    }

    #[test]
    fn test_console_directive() {
        assert_eq!(config(true, false).console_directive(), Some("debug"));
        assert_eq!(config(true, true).console_directive(), Some("debug"));
        assert_eq!(config(false, true).console_directive(), Some("warn"));
        assert_eq!(config(false, false).console_directive(), None);
    }
}
