//! Cached genre and language reference lookups.

use std::collections::HashMap;

use tracing::instrument;

use super::api::LocalTmdbApi;
use super::cache::LookupCache;

/// Genre ID to display name.
pub type GenreMap = HashMap<u32, String>;

/// ISO 639-1 code to English display name.
pub type LanguageMap = HashMap<String, String>;

/// Fetches the genre map, consulting the cache first.
///
/// Degrades to an empty map on fetch failure so that callers keep
/// working with every ID resolving to "Unknown"; failures are not
/// cached, so the next call retries.
#[instrument(skip_all)]
pub async fn fetch_genre_map(
    api: &(impl LocalTmdbApi + Sync),
    cache: &mut LookupCache<GenreMap>,
    language: &str,
) -> GenreMap {
    if let Some(map) = cache.get() {
        return map;
    }

    match api.genre_list(language).await {
        Ok(genres) => {
            let map: GenreMap = genres.into_iter().map(|g| (g.id, g.name)).collect();
            tracing::debug!(genres = map.len(), "genre map fetched");
            cache.store(map.clone());
            map
        }
        Err(err) => {
            tracing::warn!(error = %err, "genre list fetch failed, ids will resolve to \"Unknown\"");
            GenreMap::new()
        }
    }
}

/// Fetches the language map, consulting the cache first.
///
/// Returns `None` on fetch failure; callers then leave raw ISO codes
/// untouched. Failures are not cached.
#[instrument(skip_all)]
pub async fn fetch_language_map(
    api: &(impl LocalTmdbApi + Sync),
    cache: &mut LookupCache<LanguageMap>,
) -> Option<LanguageMap> {
    if let Some(map) = cache.get() {
        return Some(map);
    }

    match api.language_list().await {
        Ok(entries) => {
            let map: LanguageMap = entries
                .into_iter()
                .map(|e| (e.iso_639_1, e.english_name))
                .collect();
            tracing::debug!(languages = map.len(), "language map fetched");
            cache.store(map.clone());
            Some(map)
        }
        Err(err) => {
            tracing::warn!(error = %err, "language list fetch failed, raw codes will be kept");
            None
        }
    }
}
