//! File logging
//!
//! The terminal belongs to the UI, so log output goes to a file. Everything
//! else in the crate logs through the `tracing` macros.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};
use tracing_subscriber::EnvFilter;

static LOG_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Install the global subscriber writing to `path`.
///
/// `filter` uses `RUST_LOG` syntax (`info`, `movie_browser=debug`, ...);
/// `RUST_LOG` wins when set. Only the first call has an effect; later calls
/// return the path chosen by the first.
pub fn init(path: &Path, filter: &str) -> std::io::Result<PathBuf> {
    if let Some(existing) = LOG_PATH.get() {
        return Ok(existing.clone());
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true) // Start fresh each run
        .open(path)?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .is_ok();

    if installed {
        let _ = LOG_PATH.set(path.to_path_buf());
        tracing::info!(version = crate::VERSION, "movie-browser starting up");
    }

    Ok(LOG_PATH.get().cloned().unwrap_or_else(|| path.to_path_buf()))
}

/// Path of the active log file, if logging was initialized
pub fn log_path() -> Option<&'static Path> {
    LOG_PATH.get().map(PathBuf::as_path)
}

/// Write a separator line for readability
pub fn separator(label: &str) {
    tracing::info!("========== {} ==========", label);
}
