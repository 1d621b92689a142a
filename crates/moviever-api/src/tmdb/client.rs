//! `TmdbClient` - TMDB API client implementation.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use reqwest::Client;
use tokio::sync::Mutex;
use tracing::instrument;
use url::Url;

use super::api::LocalTmdbApi;
use super::rate_limiter::RequestPacer;
use super::types::{
    DiscoverQuery, DiscoverResponse, Genre, GenreListResponse, LanguageEntry, PageResult,
    TmdbErrorResponse,
};

/// Default base URL for TMDB API v3.
const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";

/// Per-request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Outcome of one HTTP GET, before endpoint-specific interpretation.
enum Fetched<T> {
    /// 2xx response with a decoded body.
    Body(T),
    /// HTTP 429.
    RateLimited,
}

/// TMDB API client.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests.
    base_url: Url,
    /// Bearer API token.
    api_token: String,
    /// Request pacer.
    pacer: Arc<Mutex<RequestPacer>>,
}

/// Builder for `TmdbClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClientBuilder {
    base_url: Option<Url>,
    api_token: Option<String>,
    user_agent: Option<String>,
    min_interval: Option<Duration>,
}

impl TmdbClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            api_token: None,
            user_agent: None,
            min_interval: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the API bearer token (required).
    #[must_use]
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the minimum request interval (default: 25ms).
    #[must_use]
    pub const fn min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = Some(interval);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `api_token` is not set.
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<TmdbClient> {
        let api_token = self.api_token.context("api_token is required")?;
        let user_agent = self.user_agent.context("user_agent is required")?;

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            let result = Url::parse(DEFAULT_BASE_URL);
            result.context("invalid default base URL")?
        };

        let pacer = self
            .min_interval
            .map_or_else(RequestPacer::default_interval, RequestPacer::new);

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to build HTTP client")?;

        Ok(TmdbClient {
            http_client,
            base_url,
            api_token,
            pacer: Arc::new(Mutex::new(pacer)),
        })
    }
}

impl TmdbClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> TmdbClientBuilder {
        TmdbClientBuilder::new()
    }

    /// Sends a GET request with Bearer auth, query params, and pacing.
    ///
    /// HTTP 429 is reported as `Fetched::RateLimited` so callers can
    /// decide between backoff (discover pages) and failure (reference
    /// lists). Other non-2xx statuses become errors.
    #[instrument(skip_all)]
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Fetched<T>> {
        self.pacer.lock().await.wait().await;

        let url = self
            .base_url
            .join(path)
            .with_context(|| format!("failed to join URL path: {path}"))?;

        let request = self
            .http_client
            .get(url)
            .bearer_auth(&self.api_token)
            .query(query)
            .build()
            .with_context(|| format!("failed to build request: {path}"))?;

        tracing::debug!(url = %request.url(), "TMDB API request");

        let result = self.http_client.execute(request).await;
        let response = result.with_context(|| format!("request failed: {path}"))?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            tracing::debug!(path, "TMDB API rate limited (429)");
            return Ok(Fetched::RateLimited);
        }

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<failed to read body>"));
            if let Ok(error_response) = serde_json::from_str::<TmdbErrorResponse>(&body) {
                bail!(
                    "TMDB API error (HTTP {}): code={}, message={}",
                    status,
                    error_response.status_code,
                    error_response.status_message,
                );
            }
            bail!("TMDB API error (HTTP {status}): {body}");
        }

        let body = response
            .text()
            .await
            .with_context(|| format!("failed to read response body: {path}"))?;
        let raw_result: std::result::Result<T, _> = serde_json::from_str(&body);
        let parsed =
            raw_result.with_context(|| format!("failed to decode JSON response: {path}"))?;
        Ok(Fetched::Body(parsed))
    }
}

impl LocalTmdbApi for TmdbClient {
    #[instrument(skip_all, fields(page))]
    async fn discover_page(&self, query: &DiscoverQuery, page: u32) -> Result<PageResult> {
        let fetched: Fetched<DiscoverResponse> =
            self.get_json("discover/movie", &query.to_query(page)).await?;

        Ok(match fetched {
            Fetched::Body(response) => PageResult::Success {
                records: response.results,
                total_pages: response.total_pages,
            },
            Fetched::RateLimited => PageResult::RateLimited,
        })
    }

    #[instrument(skip_all)]
    async fn genre_list(&self, language: &str) -> Result<Vec<Genre>> {
        let query = [("language", String::from(language))];
        let fetched: Fetched<GenreListResponse> =
            self.get_json("genre/movie/list", &query).await?;

        match fetched {
            Fetched::Body(response) => Ok(response.genres),
            // Reference lists are fetched once per TTL; no backoff loop here.
            Fetched::RateLimited => bail!("TMDB API rate limited (429): genre/movie/list"),
        }
    }

    #[instrument(skip_all)]
    async fn language_list(&self) -> Result<Vec<LanguageEntry>> {
        let fetched: Fetched<Vec<LanguageEntry>> =
            self.get_json("configuration/languages", &[]).await?;

        match fetched {
            Fetched::Body(entries) => Ok(entries),
            Fetched::RateLimited => bail!("TMDB API rate limited (429): configuration/languages"),
        }
    }
}
