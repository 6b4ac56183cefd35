//! Log setup.
//!
//! The terminal owns stdout and stderr while the editor runs, so logs only go
//! to a file, and only when one is requested.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Environment variable holding the filter directives.
pub const LOG_ENV: &str = "CHORDLINE_LOG";

fn filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install a global subscriber appending to `path`.
pub fn init(path: &Path) -> std::io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter())
        .with(file_layer)
        .init();

    tracing::info!(path = %path.display(), "logging initialized");
    Ok(())
}
