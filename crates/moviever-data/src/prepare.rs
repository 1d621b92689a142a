//! Raw-record to prepared-row derivation.

use chrono::{Datelike, NaiveDate};
use moviever_api::tmdb::MovieRecord;

use crate::score::gems_score;
use crate::types::{GenreMap, LanguageMap, PreparedMovie};

/// Name used for unresolvable genres and empty genre lists.
pub const UNKNOWN_GENRE: &str = "Unknown";

/// Parses a raw release-date string; empty or malformed input is `None`.
#[must_use]
pub fn parse_release_date(raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Resolves genre IDs to names; unknown IDs become [`UNKNOWN_GENRE`].
fn resolve_genres(genre_ids: &[u32], genres: &GenreMap) -> Vec<String> {
    genre_ids
        .iter()
        .map(|id| {
            genres
                .get(id)
                .cloned()
                .unwrap_or_else(|| String::from(UNKNOWN_GENRE))
        })
        .collect()
}

/// Joins genre names; an empty list reads as [`UNKNOWN_GENRE`].
#[must_use]
pub fn join_genres(genres: &[String]) -> String {
    if genres.is_empty() {
        String::from(UNKNOWN_GENRE)
    } else {
        genres.join(", ")
    }
}

/// Recomputes every derived field on an already-shaped row.
///
/// Idempotent for fixed maps: dates and scores are recomputed from the
/// base fields; genre names come from `genre_ids` (skipped when the map
/// is empty, so a degraded lookup never erases previously resolved
/// names); a language value that already is a display name misses the
/// map and stays untouched.
pub fn rederive(rows: &mut [PreparedMovie], genres: &GenreMap, languages: Option<&LanguageMap>) {
    for row in rows {
        row.year = row.release_date.map(|d| d.year());
        row.gems_score = gems_score(row.vote_average, row.vote_count, row.popularity);

        if !genres.is_empty() || row.genres.is_empty() {
            row.genres = resolve_genres(&row.genre_ids, genres);
        }
        row.genres_str = join_genres(&row.genres);

        if let Some(map) = languages
            && let Some(name) = map.get(&row.original_language)
        {
            row.original_language = name.clone();
        }
    }
}

/// Prepares raw discover records into the tabular dataset.
///
/// Pure (no network); resolution uses the maps handed in. Input order
/// is preserved and duplicates are kept as-is.
#[must_use]
pub fn prepare(
    records: &[MovieRecord],
    genres: &GenreMap,
    languages: Option<&LanguageMap>,
) -> Vec<PreparedMovie> {
    let mut rows: Vec<PreparedMovie> = records
        .iter()
        .map(|record| PreparedMovie {
            id: record.id,
            title: record.title.clone(),
            release_date: parse_release_date(record.release_date.as_deref()),
            year: None,
            vote_average: record.vote_average,
            vote_count: record.vote_count,
            popularity: record.popularity,
            gems_score: 0.0,
            genre_ids: record.genre_ids.clone(),
            genres: Vec::new(),
            genres_str: String::new(),
            original_language: record.original_language.clone(),
            adult: record.adult,
            poster_path: record.poster_path.clone(),
            overview: record.overview.clone(),
        })
        .collect();

    rederive(&mut rows, genres, languages);
    rows
}
