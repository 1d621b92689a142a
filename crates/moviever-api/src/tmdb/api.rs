//! `TmdbApi` trait definition.
#![allow(clippy::future_not_send)]

use anyhow::Result;

use super::types::{DiscoverQuery, Genre, LanguageEntry, PageResult};

/// TMDB API trait.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(TmdbApi: Send)]
pub trait LocalTmdbApi {
    /// Fetches one page of the `discover/movie` endpoint.
    ///
    /// HTTP 429 is returned as `Ok(PageResult::RateLimited)`; any other
    /// non-2xx status, transport error, or decode failure is `Err`.
    ///
    /// # Errors
    ///
    /// Returns an error on hard failure (HTTP error status, network or
    /// timeout error, malformed JSON).
    async fn discover_page(&self, query: &DiscoverQuery, page: u32) -> Result<PageResult>;

    /// Fetches the movie genre reference list.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn genre_list(&self, language: &str) -> Result<Vec<Genre>>;

    /// Fetches the ISO 639-1 language reference list.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn language_list(&self) -> Result<Vec<LanguageEntry>>;
}
