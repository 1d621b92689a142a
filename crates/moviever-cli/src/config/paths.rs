//! Config and data directory resolution.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Filename of the durable movie dataset snapshot.
pub const SNAPSHOT_FILE: &str = "tmdb_movies_data.csv";

/// Resolves the config file path.
///
/// - If `dir` is `Some`, returns `{dir}/config.toml`.
/// - Otherwise returns `~/.config/moviever/config.toml`.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined (when `dir` is `None`).
pub fn resolve_config_path(dir: Option<&PathBuf>) -> Result<PathBuf> {
    if let Some(d) = dir {
        return Ok(d.join("config.toml"));
    }

    let home = std::env::var("HOME").context("HOME environment variable is not set")?;
    Ok(PathBuf::from(home)
        .join(".config")
        .join("moviever")
        .join("config.toml"))
}

/// Resolves the data directory holding the snapshot and exports.
///
/// - If `dir` is `Some`, the data lives alongside the config there.
/// - Otherwise returns `~/.local/share/moviever`.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined (when `dir` is `None`).
pub fn resolve_data_dir(dir: Option<&PathBuf>) -> Result<PathBuf> {
    if let Some(d) = dir {
        return Ok(d.clone());
    }

    let home = std::env::var("HOME").context("HOME environment variable is not set")?;
    Ok(PathBuf::from(home)
        .join(".local")
        .join("share")
        .join("moviever"))
}

/// Path of the snapshot file under a data directory.
#[must_use]
pub fn resolve_snapshot_path(data_dir: &Path) -> PathBuf {
    data_dir.join(SNAPSHOT_FILE)
}
