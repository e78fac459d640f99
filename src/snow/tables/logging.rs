//! Console logging through `tracing-subscriber`.
//!
//! `RUST_LOG` takes precedence over the verbosity requested on the command
//! line.

use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::snow::tables::error::{ExportError, Result};

/// Maps the number of `-v` flags to a default level.
pub fn level_for(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Installs the global subscriber writing to stderr.
pub fn init_logging(verbosity: u8) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for(verbosity).as_str().to_lowercase()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|error| ExportError::Logging(error.to_string()))
}
