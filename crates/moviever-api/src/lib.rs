//! API client library for moviever.
//!
//! Provides a client for the TMDB API v3: paginated movie discovery,
//! genre/language reference lists, and a rate-limit-aware multi-page
//! collector with a TTL page cache.

/// TMDB API client.
pub mod tmdb;
