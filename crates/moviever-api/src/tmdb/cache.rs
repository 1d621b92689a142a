//! TTL caches for discover pages and reference lookups.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use super::types::MovieRecord;

/// Default time-to-live for cached responses (24 hours).
const DEFAULT_TTL: Duration = Duration::from_secs(86_400);

/// A cached successful discover page.
///
/// Rate-limited and failed outcomes are never cached.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedPage {
    /// Movies on the page, in remote order.
    pub records: Vec<MovieRecord>,
    /// Total pages reported by the remote at fetch time.
    pub total_pages: u32,
}

/// In-memory TTL cache of discover pages, keyed by query + page.
///
/// A repeated fetch with identical parameters within the TTL answers
/// from here without a network call. Single-session, overwrite-by-key;
/// no concurrent-mutation contract.
#[derive(Debug)]
pub struct PageCache {
    ttl: Duration,
    entries: HashMap<String, (Instant, CachedPage)>,
}

impl Default for PageCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl PageCache {
    /// Creates a cache with the given TTL.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Returns the cached page for `key` if present and unexpired.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&CachedPage> {
        let (stored_at, page) = self.entries.get(key)?;
        if stored_at.elapsed() < self.ttl {
            Some(page)
        } else {
            None
        }
    }

    /// Stores a page, overwriting any previous entry for `key`.
    pub fn insert(&mut self, key: String, page: CachedPage) {
        self.entries.insert(key, (Instant::now(), page));
    }

    /// Drops all cached pages (manual refresh).
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of cached pages, expired or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Single-value TTL cache for a reference lookup (genre or language map).
///
/// Each lookup has its own independently expirable cache instance.
#[derive(Debug)]
pub struct LookupCache<T> {
    ttl: Duration,
    entry: Option<(Instant, T)>,
}

impl<T: Clone> LookupCache<T> {
    /// Creates a cache with the given TTL.
    #[must_use]
    pub const fn new(ttl: Duration) -> Self {
        Self { ttl, entry: None }
    }

    /// Creates a cache with the default 24h TTL.
    #[must_use]
    pub const fn default_ttl() -> Self {
        Self::new(DEFAULT_TTL)
    }

    /// Returns the cached value if present and unexpired.
    #[must_use]
    pub fn get(&self) -> Option<T> {
        let (stored_at, value) = self.entry.as_ref()?;
        if stored_at.elapsed() < self.ttl {
            Some(value.clone())
        } else {
            None
        }
    }

    /// Stores a value, restarting the TTL clock.
    pub fn store(&mut self, value: T) {
        self.entry = Some((Instant::now(), value));
    }

    /// Drops the cached value (manual refresh).
    pub fn clear(&mut self) {
        self.entry = None;
    }
}
