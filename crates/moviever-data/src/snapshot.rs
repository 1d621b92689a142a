//! On-disk CSV snapshot persistence.
//!
//! The snapshot is the durable middle tier between the in-memory
//! session state and the remote API. List-valued columns are stored as
//! JSON text so a snapshot survives a round trip through any CSV-aware
//! tool. Older snapshots may lack derived columns; loading fills those
//! from what is present and leaves full recomputation to
//! [`crate::prepare::rederive`]. Single writer per process; there is
//! no file locking.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context as _, Result};
use tracing::warn;

use crate::prepare::{join_genres, parse_release_date};
use crate::score::gems_score;
use crate::types::PreparedMovie;

/// Column order of a full snapshot.
const HEADER: [&str; 15] = [
    "id",
    "title",
    "release_date",
    "year",
    "vote_average",
    "vote_count",
    "popularity",
    "gems_score",
    "genre_ids",
    "genres",
    "genres_str",
    "original_language",
    "adult",
    "poster_path",
    "overview",
];

/// Writes `rows` to `path`, replacing any existing snapshot.
///
/// # Errors
///
/// Returns an error when the file cannot be created or written.
pub fn save(path: &Path, rows: &[PreparedMovie]) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create snapshot: {}", path.display()))?;
    writer.write_record(HEADER)?;

    for row in rows {
        writer.write_record([
            row.id.to_string(),
            row.title.clone(),
            row.release_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            row.year.map(|y| y.to_string()).unwrap_or_default(),
            row.vote_average.to_string(),
            row.vote_count.to_string(),
            row.popularity.to_string(),
            row.gems_score.to_string(),
            serde_json::to_string(&row.genre_ids)?,
            serde_json::to_string(&row.genres)?,
            row.genres_str.clone(),
            row.original_language.clone(),
            row.adult.to_string(),
            row.poster_path.clone().unwrap_or_default(),
            row.overview.clone(),
        ])?;
    }

    writer
        .flush()
        .with_context(|| format!("Failed to write snapshot: {}", path.display()))?;
    Ok(())
}

/// Reads the snapshot at `path`.
///
/// Returns `Ok(None)` when no snapshot exists. Missing derived columns
/// are reconstructed from the base columns where possible; callers
/// should still rederive the result against current lookup maps.
///
/// # Errors
///
/// Returns an error when the file exists but cannot be read or parsed.
pub fn load(path: &Path) -> Result<Option<Vec<PreparedMovie>>> {
    if !path.exists() {
        return Ok(None);
    }

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open snapshot: {}", path.display()))?;

    let headers = reader.headers()?.clone();
    let column = |name: &str| headers.iter().position(|h| h == name);
    let columns: Vec<Option<usize>> = HEADER.iter().map(|name| column(name)).collect();
    let has_genres_column = column("genres").is_some();
    let field = |record: &csv::StringRecord, index: usize| -> Option<String> {
        columns
            .get(index)
            .copied()
            .flatten()
            .and_then(|pos| record.get(pos))
            .map(String::from)
    };

    let mut rows = Vec::new();
    for record in reader.records() {
        let record =
            record.with_context(|| format!("Malformed snapshot row: {}", path.display()))?;

        let release_date = field(&record, 2).and_then(|s| parse_release_date(Some(&s)));
        let vote_average = field(&record, 4)
            .and_then(|s| s.parse().ok())
            .unwrap_or(0.0);
        let vote_count = field(&record, 5).and_then(|s| s.parse().ok()).unwrap_or(0);
        let popularity = field(&record, 6)
            .and_then(|s| s.parse().ok())
            .unwrap_or(0.0);
        let genre_ids = field(&record, 8)
            .map(|s| parse_json_list(&s, path))
            .unwrap_or_default();
        let mut genres: Vec<String> = field(&record, 9)
            .map(|s| parse_json_list(&s, path))
            .unwrap_or_default();
        let genres_str = field(&record, 10);

        // A snapshot written before genre resolution carries only the
        // joined form; split it back rather than losing the names.
        // Applies only when the column itself is absent: an empty list
        // in a full snapshot must load back as an empty list.
        if !has_genres_column
            && let Some(joined) = &genres_str
            && !joined.is_empty()
        {
            genres = joined.split(", ").map(String::from).collect();
        }
        let genres_str = genres_str.unwrap_or_else(|| join_genres(&genres));

        rows.push(PreparedMovie {
            id: field(&record, 0).and_then(|s| s.parse().ok()).unwrap_or(0),
            title: field(&record, 1).unwrap_or_default(),
            release_date,
            year: field(&record, 3)
                .and_then(|s| s.parse().ok())
                .or_else(|| release_date.map(|d| chrono::Datelike::year(&d))),
            vote_average,
            vote_count,
            popularity,
            gems_score: field(&record, 7)
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(|| gems_score(vote_average, vote_count, popularity)),
            genre_ids,
            genres,
            genres_str,
            original_language: field(&record, 11).unwrap_or_default(),
            adult: field(&record, 12).is_some_and(|s| s == "true"),
            poster_path: field(&record, 13).filter(|s| !s.is_empty()),
            overview: field(&record, 14).unwrap_or_default(),
        });
    }

    Ok(Some(rows))
}

/// Removes the snapshot; a missing file is not an error.
///
/// # Errors
///
/// Returns an error for any removal failure other than absence.
pub fn delete(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
        Err(error) => {
            Err(error).with_context(|| format!("Failed to remove snapshot: {}", path.display()))
        }
    }
}

fn parse_json_list<T: serde::de::DeserializeOwned>(raw: &str, path: &Path) -> Vec<T> {
    if raw.is_empty() {
        return Vec::new();
    }
    match serde_json::from_str(raw) {
        Ok(list) => list,
        Err(error) => {
            warn!("Unreadable list column in {}: {error}", path.display());
            Vec::new()
        }
    }
}
