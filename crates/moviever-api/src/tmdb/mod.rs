//! TMDB API client module.
//!
//! Handles HTTP requests against the TMDB v3 `discover/movie` endpoint
//! and the genre/language reference lists, and drives the backoff-based
//! multi-page collection used to build the movie dataset.

mod api;
mod cache;
mod cancel;
mod client;
mod collector;
mod lookup;
mod rate_limiter;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalTmdbApi, TmdbApi};
pub use cache::{CachedPage, LookupCache, PageCache};
#[allow(clippy::module_name_repetitions)]
pub use cancel::CancelToken;
#[allow(clippy::module_name_repetitions)]
pub use client::{TmdbClient, TmdbClientBuilder};
pub use collector::{CollectionError, collect_movies};
pub use lookup::{GenreMap, LanguageMap, fetch_genre_map, fetch_language_map};
#[allow(clippy::module_name_repetitions)]
pub use types::{
    DiscoverQuery, DiscoverResponse, Genre, GenreListResponse, LanguageEntry, MovieRecord,
    PageResult, TmdbErrorResponse,
};
