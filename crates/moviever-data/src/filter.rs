//! Predicate-based row selection.

use crate::types::PreparedMovie;

/// Immutable predicate parameters for one query.
///
/// `None` disables a predicate (the "All" sentinel). Predicates apply
/// conjunctively; the engine never mutates the spec.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterSpec {
    /// Minimum `vote_average`.
    pub min_rating: Option<f64>,
    /// Maximum popularity.
    pub max_popularity: Option<f64>,
    /// Minimum vote count.
    pub min_vote_count: Option<u64>,
    /// Inclusive lower year bound.
    pub min_year: Option<i32>,
    /// Inclusive upper year bound.
    pub max_year: Option<i32>,
    /// Required genre name (row's genre list must contain it).
    pub genre: Option<String>,
    /// Required language (exact match on the resolved value).
    pub language: Option<String>,
    /// Whether adult titles pass (default: excluded).
    pub include_adult: bool,
    /// Whether rows without a release date pass (default: excluded).
    pub include_missing_dates: bool,
}

/// Whether one row satisfies every active predicate.
fn matches(row: &PreparedMovie, spec: &FilterSpec) -> bool {
    if !spec.include_adult && row.adult {
        return false;
    }

    if let Some(genre) = &spec.genre
        && !row.genres.iter().any(|g| g == genre)
    {
        return false;
    }

    if let Some(language) = &spec.language
        && row.original_language != *language
    {
        return false;
    }

    if let Some(floor) = spec.min_rating
        && row.vote_average < floor
    {
        return false;
    }

    if let Some(ceiling) = spec.max_popularity
        && row.popularity > ceiling
    {
        return false;
    }

    if let Some(floor) = spec.min_vote_count
        && row.vote_count < floor
    {
        return false;
    }

    if !spec.include_missing_dates && row.release_date.is_none() {
        return false;
    }

    // Null years only pass the year bounds when missing dates are
    // explicitly included.
    match row.year {
        Some(year) => {
            if let Some(min) = spec.min_year
                && year < min
            {
                return false;
            }
            if let Some(max) = spec.max_year
                && year > max
            {
                return false;
            }
        }
        None => {
            if (spec.min_year.is_some() || spec.max_year.is_some()) && !spec.include_missing_dates {
                return false;
            }
        }
    }

    true
}

/// Selects the rows satisfying `spec`, preserving input order.
#[must_use]
pub fn filter(rows: &[PreparedMovie], spec: &FilterSpec) -> Vec<PreparedMovie> {
    rows.iter().filter(|row| matches(row, spec)).cloned().collect()
}
