//! Request pacing for the TMDB API.

use std::time::{Duration, Instant};

/// Default minimum interval between requests (~40 req/s).
const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(25);

/// Minimum-interval pacer for outgoing TMDB requests.
///
/// TMDB enforces roughly 40 requests per second before answering 429.
/// Pacing requests below that ceiling keeps the collector out of the
/// backoff path in the common case; 429 handling remains the
/// collector's job.
#[derive(Debug)]
pub struct RequestPacer {
    /// Minimum interval between requests.
    min_interval: Duration,
    /// Timestamp of the most recent request.
    last_request: Option<Instant>,
}

impl RequestPacer {
    /// Creates a pacer with the given minimum interval.
    pub(crate) const fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: None,
        }
    }

    /// Creates a pacer with the default interval (25ms).
    pub(crate) const fn default_interval() -> Self {
        Self::new(DEFAULT_MIN_INTERVAL)
    }

    /// Waits until the next request is allowed.
    pub async fn wait(&mut self) {
        if let Some(last) = self.last_request {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval.saturating_sub(elapsed)).await;
            }
        }

        self.last_request = Some(Instant::now());
    }
}
