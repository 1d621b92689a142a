//! Timestamped CSV export of filtered subsets.

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Local;

use crate::snapshot;
use crate::types::PreparedMovie;

/// Writes `rows` to a timestamped CSV under `dir` and returns its path.
///
/// The filename is `movies_browse_{YYYYMMDD_HHMMSS}.csv`, so repeated
/// exports never clobber each other. The column layout matches the
/// snapshot format.
///
/// # Errors
///
/// Returns an error when the file cannot be written.
pub fn export_csv(dir: &Path, rows: &[PreparedMovie]) -> Result<PathBuf> {
    let stamp = Local::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("movies_browse_{stamp}.csv"));
    snapshot::save(&path, rows)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_export_writes_timestamped_file() {
        // Arrange
        let dir = TempDir::new().unwrap();

        // Act
        let path = export_csv(dir.path(), &[]).unwrap();

        // Assert
        assert!(path.exists());
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("movies_browse_"));
        assert!(name.ends_with(".csv"));
        assert_eq!(name.len(), "movies_browse_YYYYMMDD_HHMMSS.csv".len());
    }

    #[test]
    fn test_export_round_trips_rows() {
        // Arrange
        let dir = TempDir::new().unwrap();
        let row = PreparedMovie {
            id: 13,
            title: String::from("Forrest Gump"),
            release_date: None,
            year: None,
            vote_average: 8.5,
            vote_count: 27000,
            popularity: 60.0,
            gems_score: 0.6,
            genre_ids: vec![35, 18],
            genres: vec![String::from("Comedy"), String::from("Drama")],
            genres_str: String::from("Comedy, Drama"),
            original_language: String::from("English"),
            adult: false,
            poster_path: None,
            overview: String::from("Life is like a box of chocolates."),
        };

        // Act
        let path = export_csv(dir.path(), std::slice::from_ref(&row)).unwrap();
        let loaded = snapshot::load(&path).unwrap().unwrap();

        // Assert
        assert_eq!(loaded, vec![row]);
    }
}
