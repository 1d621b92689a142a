//! TMDB API response and request parameter types.

use serde::{Deserialize, Serialize};

/// One movie entry from the `discover/movie` endpoint.
///
/// Identifiers are unique within a single page but MAY repeat across
/// pages when the remote ordering drifts between requests. Consumers
/// must deduplicate if they need uniqueness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    /// TMDB movie ID.
    pub id: u64,
    /// Display title.
    #[serde(default)]
    pub title: String,
    /// Raw release date string (`YYYY-MM-DD`), possibly empty or absent.
    #[serde(default)]
    pub release_date: Option<String>,
    /// Average rating (0-10).
    #[serde(default)]
    pub vote_average: f64,
    /// Number of votes.
    #[serde(default)]
    pub vote_count: u64,
    /// TMDB popularity metric (>= 0).
    #[serde(default)]
    pub popularity: f64,
    /// Genre IDs (resolved to names via the genre list endpoint).
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    /// ISO 639-1 original language code.
    #[serde(default)]
    pub original_language: String,
    /// Adult content flag.
    #[serde(default)]
    pub adult: bool,
    /// Poster image path, relative to the image base URL.
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Free-text overview.
    #[serde(default)]
    pub overview: String,
}

/// Response body of the `discover/movie` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscoverResponse {
    /// 1-based page number echoed back.
    pub page: u32,
    /// Movies on this page, in remote order.
    #[serde(default)]
    pub results: Vec<MovieRecord>,
    /// Total number of pages available for this query.
    #[serde(default)]
    pub total_pages: u32,
    /// Total number of matching movies.
    #[serde(default)]
    pub total_results: u32,
}

/// One genre entry from `genre/movie/list`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Genre {
    /// Genre ID as referenced by `MovieRecord::genre_ids`.
    pub id: u32,
    /// Genre display name.
    pub name: String,
}

/// Response body of `genre/movie/list`.
#[derive(Debug, Clone, Deserialize)]
pub struct GenreListResponse {
    /// All known movie genres.
    #[serde(default)]
    pub genres: Vec<Genre>,
}

/// One entry from `configuration/languages` (a flat JSON array).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LanguageEntry {
    /// ISO 639-1 code.
    pub iso_639_1: String,
    /// English display name.
    #[serde(default)]
    pub english_name: String,
}

/// TMDB API error response body.
#[derive(Debug, Deserialize)]
pub struct TmdbErrorResponse {
    /// TMDB-specific error code.
    pub status_code: i32,
    /// Human-readable error message.
    pub status_message: String,
    /// Always `false` for errors.
    #[serde(default)]
    pub success: bool,
}

/// Outcome of a single `discover/movie` page fetch.
///
/// HTTP 429 is a value, not an error: the collector absorbs it with
/// backoff. Every other failure surfaces as `Err` from the API call.
#[derive(Debug, Clone, PartialEq)]
pub enum PageResult {
    /// The page was fetched and decoded.
    Success {
        /// Movies on this page, in remote order.
        records: Vec<MovieRecord>,
        /// Total pages reported by the remote for this query.
        total_pages: u32,
    },
    /// The remote answered HTTP 429.
    RateLimited,
}

/// Request parameters for `discover/movie`.
///
/// Carries the fixed discovery window (release date range, rating and
/// vote-count floors) alongside the user-tunable sort/language/adult
/// settings. The page number is supplied per call.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoverQuery {
    /// Sort key (default: `popularity.desc`).
    pub sort_by: String,
    /// Response language (default: `en-US`).
    pub language: String,
    /// Whether to include adult titles.
    pub include_adult: bool,
    /// Lower bound for `primary_release_date` (`YYYY-MM-DD`).
    pub release_date_gte: String,
    /// Upper bound for `primary_release_date` (`YYYY-MM-DD`).
    pub release_date_lte: String,
    /// Minimum `vote_average`.
    pub vote_average_gte: f64,
    /// Minimum `vote_count`.
    pub vote_count_gte: u64,
}

impl Default for DiscoverQuery {
    fn default() -> Self {
        Self {
            sort_by: String::from("popularity.desc"),
            language: String::from("en-US"),
            include_adult: false,
            release_date_gte: String::from("1950-01-01"),
            release_date_lte: String::from("2026-12-31"),
            vote_average_gte: 6.0,
            vote_count_gte: 10,
        }
    }
}

impl DiscoverQuery {
    /// Creates a query with the default discovery window.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the sort key.
    #[must_use]
    pub fn sort_by(mut self, sort_by: impl Into<String>) -> Self {
        self.sort_by = sort_by.into();
        self
    }

    /// Sets the response language.
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Sets the adult-content flag.
    #[must_use]
    pub const fn include_adult(mut self, include: bool) -> Self {
        self.include_adult = include;
        self
    }

    /// Sets the primary release date window from year bounds.
    #[must_use]
    pub fn release_years(mut self, min_year: i32, max_year: i32) -> Self {
        self.release_date_gte = format!("{min_year}-01-01");
        self.release_date_lte = format!("{max_year}-12-31");
        self
    }

    /// Sets the vote average floor.
    #[must_use]
    pub const fn vote_average_gte(mut self, floor: f64) -> Self {
        self.vote_average_gte = floor;
        self
    }

    /// Sets the vote count floor.
    #[must_use]
    pub const fn vote_count_gte(mut self, floor: u64) -> Self {
        self.vote_count_gte = floor;
        self
    }

    /// Builds the query string pairs for a given page.
    #[must_use]
    pub fn to_query(&self, page: u32) -> Vec<(&'static str, String)> {
        vec![
            ("include_adult", self.include_adult.to_string()),
            ("language", self.language.clone()),
            ("sort_by", self.sort_by.clone()),
            ("page", page.to_string()),
            ("primary_release_date.gte", self.release_date_gte.clone()),
            ("primary_release_date.lte", self.release_date_lte.clone()),
            ("vote_average.gte", self.vote_average_gte.to_string()),
            ("vote_count.gte", self.vote_count_gte.to_string()),
        ]
    }

    /// Canonical cache key for this query at a given page.
    ///
    /// Identical parameters within the cache TTL must answer from the
    /// page cache without a network call.
    #[must_use]
    pub fn cache_key(&self, page: u32) -> String {
        let pairs: Vec<String> = self
            .to_query(page)
            .into_iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect();
        pairs.join("&")
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use super::*;

    #[test]
    fn test_discover_query_defaults() {
        // Arrange & Act
        let query = DiscoverQuery::new();

        // Assert
        assert_eq!(query.sort_by, "popularity.desc");
        assert_eq!(query.language, "en-US");
        assert!(!query.include_adult);
        assert_eq!(query.release_date_gte, "1950-01-01");
        assert_eq!(query.release_date_lte, "2026-12-31");
    }

    #[test]
    fn test_discover_query_to_query_includes_page() {
        // Arrange
        let query = DiscoverQuery::new().release_years(2000, 2020);

        // Act
        let pairs = query.to_query(7);

        // Assert
        assert!(pairs.contains(&("page", String::from("7"))));
        assert!(pairs.contains(&("primary_release_date.gte", String::from("2000-01-01"))));
        assert!(pairs.contains(&("primary_release_date.lte", String::from("2020-12-31"))));
    }

    #[test]
    fn test_cache_key_differs_by_page() {
        // Arrange
        let query = DiscoverQuery::new();

        // Act & Assert
        assert_ne!(query.cache_key(1), query.cache_key(2));
        assert_eq!(query.cache_key(3), query.cache_key(3));
    }

    #[test]
    fn test_parse_movie_record_with_missing_optionals() {
        // Arrange
        let json = r#"{"id":42,"title":"Example","vote_average":7.1,"vote_count":10,"popularity":3.5,"genre_ids":[18],"original_language":"en","adult":false,"overview":"x"}"#;

        // Act
        let record: MovieRecord = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(record.id, 42);
        assert_eq!(record.release_date, None);
        assert_eq!(record.poster_path, None);
    }

    #[test]
    fn test_parse_discover_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/tmdb/discover_page_1.json");

        // Act
        let response: DiscoverResponse = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(response.page, 1);
        assert_eq!(response.total_pages, 3);
        assert!(!response.results.is_empty());
        let first = &response.results[0];
        assert_eq!(first.id, 278);
        assert_eq!(first.original_language, "en");
        assert_eq!(first.genre_ids, vec![18, 80]);
    }

    #[test]
    fn test_parse_genre_list_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/tmdb/genre_list.json");

        // Act
        let response: GenreListResponse = serde_json::from_str(json).unwrap();

        // Assert
        assert!(response.genres.iter().any(|g| g.name == "Comedy"));
        assert!(response.genres.iter().any(|g| g.id == 18));
    }

    #[test]
    fn test_parse_languages_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/tmdb/languages.json");

        // Act
        let entries: Vec<LanguageEntry> = serde_json::from_str(json).unwrap();

        // Assert
        let en = entries.iter().find(|e| e.iso_639_1 == "en").unwrap();
        assert_eq!(en.english_name, "English");
    }

    #[test]
    fn test_parse_error_response() {
        // Arrange
        let json = r#"{"status_code":7,"status_message":"Invalid API key: You must be granted a valid key.","success":false}"#;

        // Act
        let error: TmdbErrorResponse = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(error.status_code, 7);
        assert!(!error.success);
        assert!(error.status_message.contains("Invalid API key"));
    }
}
