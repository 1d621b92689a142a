//! Prepared-row data model.

use chrono::NaiveDate;

pub use moviever_api::tmdb::{GenreMap, LanguageMap};

/// One movie with all derived attributes in place.
///
/// Derived fields (`release_date`, `year`, `gems_score`, `genres`,
/// `genres_str`, resolved `original_language`) are recomputed by
/// [`crate::prepare`]; recomputation is idempotent, so a prepared row
/// can safely be prepared again.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedMovie {
    /// TMDB movie ID. Not guaranteed unique across pages.
    pub id: u64,
    /// Display title.
    pub title: String,
    /// Parsed release date; `None` when missing or unparseable.
    pub release_date: Option<NaiveDate>,
    /// Release year derived from `release_date`.
    pub year: Option<i32>,
    /// Average rating (0-10).
    pub vote_average: f64,
    /// Number of votes.
    pub vote_count: u64,
    /// TMDB popularity metric (>= 0).
    pub popularity: f64,
    /// Popularity-discounted quality score; always finite and >= 0.
    pub gems_score: f64,
    /// Raw genre IDs from the remote.
    pub genre_ids: Vec<u32>,
    /// Resolved genre names, same order as `genre_ids`.
    pub genres: Vec<String>,
    /// Comma-joined genre names; "Unknown" when empty.
    pub genres_str: String,
    /// Language: English display name when resolvable, else raw code.
    pub original_language: String,
    /// Adult content flag.
    pub adult: bool,
    /// Poster image path, relative to the image base URL.
    pub poster_path: Option<String>,
    /// Free-text overview.
    pub overview: String,
}
