//! Backoff-driven multi-page movie collection.

use std::time::Duration;

use thiserror::Error;
use tracing::instrument;

use super::api::LocalTmdbApi;
use super::cache::{CachedPage, PageCache};
use super::cancel::CancelToken;
use super::types::{DiscoverQuery, PageResult};

/// Initial rate-limit backoff.
const INITIAL_BACKOFF: Duration = Duration::from_secs(1);

/// Backoff cap.
const MAX_BACKOFF: Duration = Duration::from_secs(10);

/// Failure modes of a collection run.
///
/// Rate limiting never appears here: it is absorbed by the backoff
/// loop. Only structural failures reach the caller.
#[derive(Debug, Error)]
pub enum CollectionError {
    /// Every page in the budget returned zero records.
    #[error("no movies collected; check the API token and connection")]
    Empty,
    /// A page request failed hard (HTTP error, network, malformed JSON).
    #[error("discover page {page} failed")]
    Fetch {
        /// 1-based page number that failed.
        page: u32,
        /// Underlying client error.
        #[source]
        source: anyhow::Error,
    },
    /// The run was cancelled from outside.
    #[error("collection cancelled")]
    Cancelled,
}

/// Fetches one page, riding out rate limits with exponential backoff.
///
/// Retries the same page indefinitely on 429: skipping a persistently
/// rate-limited page would leave a silent gap in the dataset. The
/// cancel token is the only way out of a stall.
async fn fetch_page_with_backoff(
    api: &(impl LocalTmdbApi + Sync),
    cache: &mut PageCache,
    query: &DiscoverQuery,
    page: u32,
    cancel: &CancelToken,
) -> Result<CachedPage, CollectionError> {
    let key = query.cache_key(page);
    let mut backoff = INITIAL_BACKOFF;

    loop {
        if cancel.is_cancelled() {
            return Err(CollectionError::Cancelled);
        }

        if let Some(hit) = cache.get(&key) {
            tracing::debug!(page, "discover page served from cache");
            return Ok(hit.clone());
        }

        match api.discover_page(query, page).await {
            Ok(PageResult::Success {
                records,
                total_pages,
            }) => {
                let fetched = CachedPage {
                    records,
                    total_pages,
                };
                cache.insert(key, fetched.clone());
                return Ok(fetched);
            }
            Ok(PageResult::RateLimited) => {
                // Cancelled mid-flight: abort now instead of waiting
                // out one more backoff interval.
                if cancel.is_cancelled() {
                    return Err(CollectionError::Cancelled);
                }
                tracing::warn!(
                    page,
                    backoff_secs = backoff.as_secs(),
                    "rate limited, waiting before retrying the same page"
                );
                tokio::time::sleep(backoff).await;
                backoff = backoff.saturating_mul(2).min(MAX_BACKOFF);
            }
            Err(source) => return Err(CollectionError::Fetch { page, source }),
        }
    }
}

/// Collects movies across a bounded page range.
///
/// Pages are fetched strictly sequentially: `total_pages` is only
/// learned from the first successful page, and backoff state carries
/// across iterations. Page order and within-page order are preserved;
/// no deduplication is performed here.
///
/// Stops early when a page returns zero records (end of data) or when
/// the reported total page count (clamped to `max_pages`) is reached.
///
/// # Errors
///
/// - [`CollectionError::Fetch`] on the first hard failure (no retry).
/// - [`CollectionError::Empty`] when the whole run yields no records.
/// - [`CollectionError::Cancelled`] when the token is cancelled.
#[instrument(skip_all, fields(max_pages))]
pub async fn collect_movies(
    api: &(impl LocalTmdbApi + Sync),
    cache: &mut PageCache,
    query: &DiscoverQuery,
    max_pages: u32,
    cancel: &CancelToken,
) -> Result<Vec<super::types::MovieRecord>, CollectionError> {
    let mut all_movies = Vec::new();
    let mut total_pages: Option<u32> = None;

    for page in 1..=max_pages {
        let fetched = fetch_page_with_backoff(api, cache, query, page, cancel).await?;

        if total_pages.is_none() {
            let clamped = fetched.total_pages.min(max_pages);
            tracing::info!(
                reported = fetched.total_pages,
                clamped,
                "total page count learned from first page"
            );
            total_pages = Some(clamped);
        }

        if fetched.records.is_empty() {
            tracing::info!(page, "empty page, treating as end of data");
            break;
        }

        all_movies.extend(fetched.records);
        tracing::info!(page, collected = all_movies.len(), "discover page completed");

        if let Some(limit) = total_pages
            && page >= limit
        {
            break;
        }
    }

    if all_movies.is_empty() {
        return Err(CollectionError::Empty);
    }

    tracing::info!(total = all_movies.len(), "collection completed");
    Ok(all_movies)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    use anyhow::{Result, anyhow};

    use super::*;
    use crate::tmdb::api::LocalTmdbApi;
    use crate::tmdb::types::{Genre, LanguageEntry, MovieRecord};

    /// One scripted reply for the mock API.
    enum Step {
        Page(Vec<MovieRecord>, u32),
        RateLimited,
        Fail,
    }

    /// Mock API that replays a fixed script of page outcomes.
    struct ScriptedTmdb {
        steps: Mutex<Vec<Step>>,
        calls: AtomicU32,
    }

    impl ScriptedTmdb {
        fn new(steps: Vec<Step>) -> Self {
            Self {
                steps: Mutex::new(steps),
                calls: AtomicU32::new(0),
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl LocalTmdbApi for ScriptedTmdb {
        async fn discover_page(&self, _query: &DiscoverQuery, _page: u32) -> Result<PageResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut steps = self.steps.lock().unwrap();
            if steps.is_empty() {
                return Ok(PageResult::Success {
                    records: vec![],
                    total_pages: 0,
                });
            }
            match steps.remove(0) {
                Step::Page(records, total_pages) => Ok(PageResult::Success {
                    records,
                    total_pages,
                }),
                Step::RateLimited => Ok(PageResult::RateLimited),
                Step::Fail => Err(anyhow!("boom")),
            }
        }

        async fn genre_list(&self, _language: &str) -> Result<Vec<Genre>> {
            Ok(vec![])
        }

        async fn language_list(&self) -> Result<Vec<LanguageEntry>> {
            Ok(vec![])
        }
    }

    /// Helper to create a minimal `MovieRecord`.
    fn make_movie(id: u64) -> MovieRecord {
        MovieRecord {
            id,
            title: format!("Movie {id}"),
            release_date: Some(String::from("2024-01-01")),
            vote_average: 7.0,
            vote_count: 100,
            popularity: 5.0,
            genre_ids: vec![18],
            original_language: String::from("en"),
            adult: false,
            poster_path: None,
            overview: String::new(),
        }
    }

    fn make_movies(ids: std::ops::Range<u64>) -> Vec<MovieRecord> {
        ids.map(make_movie).collect()
    }

    #[tokio::test]
    async fn test_stops_after_reported_total_pages() {
        // Arrange: 20 records, total_pages=1, budget 3
        let api = ScriptedTmdb::new(vec![Step::Page(make_movies(1..21), 1)]);
        let mut cache = PageCache::default();

        // Act
        let movies = collect_movies(
            &api,
            &mut cache,
            &DiscoverQuery::new(),
            3,
            &CancelToken::new(),
        )
        .await
        .unwrap();

        // Assert
        assert_eq!(movies.len(), 20);
        assert_eq!(api.calls(), 1);
    }

    #[tokio::test]
    async fn test_clamps_total_pages_to_budget() {
        // Arrange: remote reports 500 pages, budget is 2
        let api = ScriptedTmdb::new(vec![
            Step::Page(make_movies(1..3), 500),
            Step::Page(make_movies(3..5), 500),
            Step::Page(make_movies(5..7), 500),
        ]);
        let mut cache = PageCache::default();

        // Act
        let movies = collect_movies(
            &api,
            &mut cache,
            &DiscoverQuery::new(),
            2,
            &CancelToken::new(),
        )
        .await
        .unwrap();

        // Assert
        assert_eq!(movies.len(), 4);
        assert_eq!(api.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_retries_same_page_then_succeeds() {
        // Arrange: 429 twice, then success on the same page
        let api = ScriptedTmdb::new(vec![
            Step::RateLimited,
            Step::RateLimited,
            Step::Page(make_movies(1..4), 1),
        ]);
        let mut cache = PageCache::default();
        let start = tokio::time::Instant::now();

        // Act
        let movies = collect_movies(
            &api,
            &mut cache,
            &DiscoverQuery::new(),
            1,
            &CancelToken::new(),
        )
        .await
        .unwrap();

        // Assert: two backoff sleeps of 1s then 2s, page never skipped
        assert_eq!(movies.len(), 3);
        assert_eq!(api.calls(), 3);
        assert_eq!(start.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_is_capped() {
        // Arrange: six 429s then success; 1+2+4+8+10+10 = 35s
        let api = ScriptedTmdb::new(vec![
            Step::RateLimited,
            Step::RateLimited,
            Step::RateLimited,
            Step::RateLimited,
            Step::RateLimited,
            Step::RateLimited,
            Step::Page(make_movies(1..2), 1),
        ]);
        let mut cache = PageCache::default();
        let start = tokio::time::Instant::now();

        // Act
        let movies = collect_movies(
            &api,
            &mut cache,
            &DiscoverQuery::new(),
            1,
            &CancelToken::new(),
        )
        .await
        .unwrap();

        // Assert
        assert_eq!(movies.len(), 1);
        assert_eq!(start.elapsed(), Duration::from_secs(35));
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_resets_after_success() {
        // Arrange: page 1 needs two retries (1s + 2s), page 2 needs one.
        // If backoff did not reset, the page-2 wait would be 4s.
        let api = ScriptedTmdb::new(vec![
            Step::RateLimited,
            Step::RateLimited,
            Step::Page(make_movies(1..3), 2),
            Step::RateLimited,
            Step::Page(make_movies(3..5), 2),
        ]);
        let mut cache = PageCache::default();
        let start = tokio::time::Instant::now();

        // Act
        let movies = collect_movies(
            &api,
            &mut cache,
            &DiscoverQuery::new(),
            2,
            &CancelToken::new(),
        )
        .await
        .unwrap();

        // Assert: 1+2 for page 1, then 1 for page 2
        assert_eq!(movies.len(), 4);
        assert_eq!(start.elapsed(), Duration::from_secs(4));
    }

    #[tokio::test]
    async fn test_empty_page_stops_early() {
        // Arrange: page 2 is empty, budget 5
        let api = ScriptedTmdb::new(vec![
            Step::Page(make_movies(1..3), 5),
            Step::Page(vec![], 5),
            Step::Page(make_movies(10..12), 5),
        ]);
        let mut cache = PageCache::default();

        // Act
        let movies = collect_movies(
            &api,
            &mut cache,
            &DiscoverQuery::new(),
            5,
            &CancelToken::new(),
        )
        .await
        .unwrap();

        // Assert: only page 1 records, page 3 never requested
        assert_eq!(movies.len(), 2);
        assert_eq!(api.calls(), 2);
    }

    #[tokio::test]
    async fn test_hard_failure_propagates_immediately() {
        // Arrange
        let api = ScriptedTmdb::new(vec![Step::Page(make_movies(1..3), 5), Step::Fail]);
        let mut cache = PageCache::default();

        // Act
        let result = collect_movies(
            &api,
            &mut cache,
            &DiscoverQuery::new(),
            5,
            &CancelToken::new(),
        )
        .await;

        // Assert
        let err = result.unwrap_err();
        assert!(matches!(err, CollectionError::Fetch { page: 2, .. }));
        assert_eq!(api.calls(), 2);
    }

    #[tokio::test]
    async fn test_all_pages_empty_is_an_error() {
        // Arrange
        let api = ScriptedTmdb::new(vec![Step::Page(vec![], 5)]);
        let mut cache = PageCache::default();

        // Act
        let result = collect_movies(
            &api,
            &mut cache,
            &DiscoverQuery::new(),
            5,
            &CancelToken::new(),
        )
        .await;

        // Assert
        assert!(matches!(result.unwrap_err(), CollectionError::Empty));
    }

    #[tokio::test]
    async fn test_cache_hit_skips_network() {
        // Arrange: the script would fail, but page 1 is cached
        let api = ScriptedTmdb::new(vec![Step::Fail]);
        let mut cache = PageCache::default();
        let query = DiscoverQuery::new();
        cache.insert(
            query.cache_key(1),
            CachedPage {
                records: make_movies(1..4),
                total_pages: 1,
            },
        );

        // Act
        let movies = collect_movies(&api, &mut cache, &query, 3, &CancelToken::new())
            .await
            .unwrap();

        // Assert
        assert_eq!(movies.len(), 3);
        assert_eq!(api.calls(), 0);
    }

    #[tokio::test]
    async fn test_cancelled_token_aborts() {
        // Arrange
        let api = ScriptedTmdb::new(vec![Step::Page(make_movies(1..3), 5)]);
        let mut cache = PageCache::default();
        let cancel = CancelToken::new();
        cancel.cancel();

        // Act
        let result = collect_movies(&api, &mut cache, &DiscoverQuery::new(), 5, &cancel).await;

        // Assert
        assert!(matches!(result.unwrap_err(), CollectionError::Cancelled));
        assert_eq!(api.calls(), 0);
    }

    /// Mock API that cancels the shared token during the request, then
    /// reports a rate limit.
    struct CancelMidFlightTmdb {
        cancel: CancelToken,
    }

    impl LocalTmdbApi for CancelMidFlightTmdb {
        async fn discover_page(&self, _query: &DiscoverQuery, _page: u32) -> Result<PageResult> {
            self.cancel.cancel();
            Ok(PageResult::RateLimited)
        }

        async fn genre_list(&self, _language: &str) -> Result<Vec<Genre>> {
            Ok(vec![])
        }

        async fn language_list(&self) -> Result<Vec<LanguageEntry>> {
            Ok(vec![])
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_rate_limited_fetch_skips_backoff_sleep() {
        // Arrange
        let cancel = CancelToken::new();
        let api = CancelMidFlightTmdb {
            cancel: cancel.clone(),
        };
        let mut cache = PageCache::default();
        let start = tokio::time::Instant::now();

        // Act
        let result = collect_movies(&api, &mut cache, &DiscoverQuery::new(), 5, &cancel).await;

        // Assert: aborted before the 1s backoff, not after it
        assert!(matches!(result.unwrap_err(), CollectionError::Cancelled));
        assert_eq!(start.elapsed(), Duration::from_secs(0));
    }

    #[tokio::test]
    async fn test_order_is_preserved() {
        // Arrange
        let api = ScriptedTmdb::new(vec![
            Step::Page(make_movies(10..13), 2),
            Step::Page(make_movies(1..4), 2),
        ]);
        let mut cache = PageCache::default();

        // Act
        let movies = collect_movies(
            &api,
            &mut cache,
            &DiscoverQuery::new(),
            2,
            &CancelToken::new(),
        )
        .await
        .unwrap();

        // Assert: page order then within-page order
        let ids: Vec<u64> = movies.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![10, 11, 12, 1, 2, 3]);
    }
}
