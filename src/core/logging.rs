//! Logging macros and subscriber setup
//!
//! All events go through `tracing` under the `massive_encoding` target.

use once_cell::sync::OnceCell;
use tracing_subscriber::EnvFilter;

use crate::core::config::LoggingConfig;
use crate::core::error::{Error, Result};

/// Target attached to every event emitted by this crate
pub const LOG_TARGET: &str = "massive_encoding";

/// Info level logging - general information messages
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::tracing::info!(target: "massive_encoding", $($arg)*)
    };
}

/// Warning level logging - potentially problematic situations
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::tracing::warn!(target: "massive_encoding", $($arg)*)
    };
}

/// Error level logging - error conditions
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::tracing::error!(target: "massive_encoding", $($arg)*)
    };
}

/// Debug level logging - detailed information for debugging
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        $crate::tracing::debug!(target: "massive_encoding", $($arg)*)
    };
}

/// Trace level logging - very detailed tracing information
#[macro_export]
macro_rules! log_trace {
    ($($arg:tt)*) => {
        $crate::tracing::trace!(target: "massive_encoding", $($arg)*)
    };
}

static INIT: OnceCell<()> = OnceCell::new();

/// Install a global `tracing` subscriber configured from `config`
///
/// `RUST_LOG` takes precedence over `config.level`. Only the first call has
/// any effect.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    INIT.get_or_try_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.level.as_str()));
        let builder = tracing_subscriber::fmt().with_env_filter(filter);

        let installed = match config.format.as_str() {
            "json" => builder.json().try_init(),
            "compact" => builder.compact().try_init(),
            _ => builder.pretty().try_init(),
        };
        installed.map_err(|e| Error::config(format!("Failed to install log subscriber: {}", e)))
    })?;
    Ok(())
}
