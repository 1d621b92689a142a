//! Session-scoped dataset state and the tiered data path.
//!
//! A [`Session`] owns everything that lives for one program run: the
//! prepared dataset, the page cache, the genre/language lookup caches,
//! and the cancel token. [`Session::get_data`] walks the three tiers
//! (memory, CSV snapshot, remote collection); [`Session::refresh`]
//! drops all of them so the next call re-collects.

use std::path::PathBuf;

use anyhow::Result;
use moviever_api::tmdb::{
    CancelToken, DiscoverQuery, GenreMap, LanguageMap, LocalTmdbApi, LookupCache, PageCache,
    collect_movies, fetch_genre_map, fetch_language_map,
};
use moviever_data::prepare::{prepare, rederive};
use moviever_data::snapshot;
use moviever_data::types::PreparedMovie;
use tracing::instrument;

/// One run's worth of dataset state.
pub struct Session {
    /// Where the durable snapshot lives.
    snapshot_path: PathBuf,
    /// Prepared dataset, once any tier has produced it.
    prepared: Option<Vec<PreparedMovie>>,
    /// Per-page discover responses.
    pages: PageCache,
    /// Cached genre reference list.
    genres: LookupCache<GenreMap>,
    /// Cached language reference list.
    languages: LookupCache<LanguageMap>,
    /// Cancels an in-flight collection run.
    cancel: CancelToken,
}

impl Session {
    /// Creates an empty session backed by the given snapshot path.
    #[must_use]
    pub fn new(snapshot_path: PathBuf) -> Self {
        Self {
            snapshot_path,
            prepared: None,
            pages: PageCache::default(),
            genres: LookupCache::default_ttl(),
            languages: LookupCache::default_ttl(),
            cancel: CancelToken::new(),
        }
    }

    /// Handle for cancelling an in-flight collection from elsewhere.
    #[must_use]
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Returns the prepared dataset, filling it tier by tier.
    ///
    /// Memory first, then the CSV snapshot, then a remote collection
    /// run. Whatever the source, the rows are rederived against the
    /// current lookup maps before being returned. A failed collection
    /// is logged and yields `None`; previously held data (if any) is
    /// kept untouched for the next call.
    #[instrument(skip_all, fields(max_pages))]
    pub async fn get_data(
        &mut self,
        api: &(impl LocalTmdbApi + Sync),
        query: &DiscoverQuery,
        max_pages: u32,
        language: &str,
    ) -> Option<&[PreparedMovie]> {
        let genre_map = fetch_genre_map(api, &mut self.genres, language).await;
        let language_map = fetch_language_map(api, &mut self.languages).await;

        if self.prepared.is_none() {
            match snapshot::load(&self.snapshot_path) {
                Ok(Some(rows)) if !rows.is_empty() => {
                    tracing::info!(rows = rows.len(), "dataset loaded from snapshot");
                    self.prepared = Some(rows);
                }
                Ok(_) => {}
                Err(err) => {
                    tracing::warn!(error = %err, "snapshot unreadable, falling back to collection");
                }
            }
        }

        if self.prepared.is_none() {
            match collect_movies(api, &mut self.pages, query, max_pages, &self.cancel).await {
                Ok(records) => {
                    let rows = prepare(&records, &genre_map, language_map.as_ref());
                    if let Err(err) = snapshot::save(&self.snapshot_path, &rows) {
                        tracing::warn!(error = %err, "snapshot write failed, continuing in memory");
                    }
                    tracing::info!(rows = rows.len(), "dataset collected from remote");
                    self.prepared = Some(rows);
                }
                Err(err) => {
                    tracing::error!(error = %err, "collection failed");
                    return None;
                }
            }
        }

        let rows = self.prepared.as_mut()?;
        rederive(rows, &genre_map, language_map.as_ref());
        Some(rows)
    }

    /// Drops every tier: memory, page cache, lookup caches, snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error when the snapshot exists but cannot be removed.
    pub fn refresh(&mut self) -> Result<()> {
        self.prepared = None;
        self.pages.clear();
        self.genres.clear();
        self.languages.clear();
        snapshot::delete(&self.snapshot_path)
    }
}
