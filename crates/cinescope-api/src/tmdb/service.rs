//! `TmdbService` - cached catalog operations over a [`LocalTmdbApi`].

use std::sync::Arc;

use chrono::{Datelike, Months, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use tracing::instrument;

use super::api::LocalTmdbApi;
use super::cache::TtlCache;
use super::error::{CatalogError, UpstreamError};
use super::metrics::record_cache_lookup;
use super::params::{DEFAULT_LANGUAGE, MediaId, QueryParams, RequestKey};
use super::types::{
    Credits, GenreList, Movie, MovieDetails, Paged, TrendingItem, TvShow, TvShowDetails,
    VideoList,
};

/// Release types used by the discover-based lists (theatrical limited + wide).
const THEATRICAL_RELEASE_TYPES: &str = "2|3";

/// Cached access to TMDB.
///
/// Every call goes through the injected [`TtlCache`] first; only misses reach
/// the adapter. Payloads are cached after they decode, so a malformed body is
/// never served from the cache.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbService<A> {
    api: A,
    cache: Arc<TtlCache>,
    language: String,
}

impl<A> TmdbService<A> {
    /// Wraps `api` with `cache`.
    #[must_use]
    pub fn new(api: A, cache: Arc<TtlCache>) -> Self {
        Self {
            api,
            cache,
            language: String::from(DEFAULT_LANGUAGE),
        }
    }

    /// Overrides the response language (default: `en-US`).
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// The underlying adapter.
    pub const fn api(&self) -> &A {
        &self.api
    }

    /// The shared response cache.
    #[must_use]
    pub fn cache(&self) -> &TtlCache {
        &self.cache
    }

    /// Drops every cached response.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Base parameters carried by every catalog request.
    fn base_params(&self) -> QueryParams {
        QueryParams::new().with("language", &self.language)
    }

    /// Base parameters plus a validated page number.
    fn paged_params(&self, page: u32) -> Result<QueryParams, CatalogError> {
        if page == 0 {
            return Err(CatalogError::InvalidPage);
        }
        Ok(self.base_params().with("page", page))
    }
}

impl<A: LocalTmdbApi + Sync> TmdbService<A> {
    /// Fetches `endpoint`, serving from the cache while fresh.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError`] if the adapter fails or the payload does not
    /// decode into `T`.
    #[instrument(skip_all, fields(endpoint = endpoint))]
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &QueryParams,
    ) -> Result<T, UpstreamError> {
        let key = RequestKey::new(endpoint, params);
        let decode = |source| UpstreamError::Decode {
            endpoint: String::from(endpoint),
            source,
        };

        if let Some(payload) = self.cache.get(&key) {
            record_cache_lookup(true);
            tracing::debug!(%key, "cache hit");
            return T::deserialize(&payload).map_err(decode);
        }

        record_cache_lookup(false);
        tracing::debug!(%key, "cache miss");
        let payload = self.api.request(endpoint, params).await?;
        let parsed = T::deserialize(&payload).map_err(decode)?;
        self.cache.put(key, payload);
        Ok(parsed)
    }

    /// Fetches one page of a list endpoint.
    async fn fetch_page<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: QueryParams,
    ) -> Result<Paged<T>, CatalogError> {
        Ok(self.fetch(endpoint, &params).await?)
    }

    // --- Movie lists ---

    /// `movie/popular`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if `page` is 0 or the upstream call fails.
    pub async fn popular_movies(&self, page: u32) -> Result<Paged<Movie>, CatalogError> {
        self.fetch_page("movie/popular", self.paged_params(page)?).await
    }

    /// `movie/top_rated`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if `page` is 0 or the upstream call fails.
    pub async fn top_rated_movies(&self, page: u32) -> Result<Paged<Movie>, CatalogError> {
        self.fetch_page("movie/top_rated", self.paged_params(page)?).await
    }

    /// `movie/now_playing`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if `page` is 0 or the upstream call fails.
    pub async fn now_playing_movies(&self, page: u32) -> Result<Paged<Movie>, CatalogError> {
        self.fetch_page("movie/now_playing", self.paged_params(page)?).await
    }

    /// Upcoming theatrical releases, most popular first.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if `page` is 0 or the upstream call fails.
    pub async fn upcoming_movies(&self, page: u32) -> Result<Paged<Movie>, CatalogError> {
        let window = ReleaseWindow::upcoming(Utc::now().date_naive());
        let params = window
            .apply(self.paged_params(page)?)
            .with("include_adult", false)
            .with("include_video", false);
        self.fetch_page("discover/movie", params).await
    }

    /// Currently trending theatrical releases, most popular first.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if `page` is 0 or the upstream call fails.
    pub async fn trending_movies(&self, page: u32) -> Result<Paged<Movie>, CatalogError> {
        let window = ReleaseWindow::trending(Utc::now().date_naive());
        let params = window.apply(self.paged_params(page)?);
        self.fetch_page("discover/movie", params).await
    }

    /// Movies in one genre.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if `page` is 0 or the upstream call fails.
    pub async fn movies_by_genre(
        &self,
        genre_id: u32,
        page: u32,
    ) -> Result<Paged<Movie>, CatalogError> {
        let params = self.paged_params(page)?.with("with_genres", genre_id);
        self.fetch_page("discover/movie", params).await
    }

    /// `search/movie`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidQuery`] for a blank query (no request is
    /// made), or another [`CatalogError`] if `page` is 0 or the call fails.
    pub async fn search_movies(
        &self,
        query: &str,
        page: u32,
    ) -> Result<Paged<Movie>, CatalogError> {
        let params = self
            .paged_params(page)?
            .with("query", non_blank(query)?)
            .with("include_adult", false);
        self.fetch_page("search/movie", params).await
    }

    /// `genre/movie/list`.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError`] if the upstream call fails.
    pub async fn movie_genres(&self) -> Result<GenreList, UpstreamError> {
        let params = QueryParams::new().with("language", "en");
        self.fetch("genre/movie/list", &params).await
    }

    // --- TV lists ---

    /// `tv/popular`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if `page` is 0 or the upstream call fails.
    pub async fn popular_tv_shows(&self, page: u32) -> Result<Paged<TvShow>, CatalogError> {
        self.fetch_page("tv/popular", self.paged_params(page)?).await
    }

    /// `tv/top_rated`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if `page` is 0 or the upstream call fails.
    pub async fn top_rated_tv_shows(&self, page: u32) -> Result<Paged<TvShow>, CatalogError> {
        self.fetch_page("tv/top_rated", self.paged_params(page)?).await
    }

    /// `tv/on_the_air`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if `page` is 0 or the upstream call fails.
    pub async fn on_air_tv_shows(&self, page: u32) -> Result<Paged<TvShow>, CatalogError> {
        self.fetch_page("tv/on_the_air", self.paged_params(page)?).await
    }

    /// Trending TV shows, most popular first.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if `page` is 0 or the upstream call fails.
    pub async fn trending_tv_shows(&self, page: u32) -> Result<Paged<TvShow>, CatalogError> {
        let params = self
            .paged_params(page)?
            .with("include_adult", false)
            .with("include_null_first_air_dates", false)
            .with("sort_by", "popularity.desc");
        self.fetch_page("discover/tv", params).await
    }

    /// `search/tv`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidQuery`] for a blank query (no request is
    /// made), or another [`CatalogError`] if `page` is 0 or the call fails.
    pub async fn search_tv_shows(
        &self,
        query: &str,
        page: u32,
    ) -> Result<Paged<TvShow>, CatalogError> {
        let params = self.paged_params(page)?.with("query", non_blank(query)?);
        self.fetch_page("search/tv", params).await
    }

    // --- Mixed ---

    /// `trending/all/day`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if `page` is 0 or the upstream call fails.
    pub async fn trending_all(&self, page: u32) -> Result<Paged<TrendingItem>, CatalogError> {
        self.fetch_page("trending/all/day", self.paged_params(page)?).await
    }

    // --- Detail sub-fetches ---

    /// `movie/{id}`.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError`] if the upstream call fails.
    pub async fn movie_details(&self, id: MediaId) -> Result<MovieDetails, UpstreamError> {
        self.fetch(&format!("movie/{id}"), &self.base_params()).await
    }

    /// `movie/{id}/credits`.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError`] if the upstream call fails.
    pub async fn movie_credits(&self, id: MediaId) -> Result<Credits, UpstreamError> {
        self.fetch(&format!("movie/{id}/credits"), &self.base_params()).await
    }

    /// `movie/{id}/recommendations` (first page).
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError`] if the upstream call fails.
    pub async fn movie_recommendations(&self, id: MediaId) -> Result<Paged<Movie>, UpstreamError> {
        let params = self.base_params().with("page", 1);
        self.fetch(&format!("movie/{id}/recommendations"), &params).await
    }

    /// `movie/{id}/videos`.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError`] if the upstream call fails.
    pub async fn movie_videos(&self, id: MediaId) -> Result<VideoList, UpstreamError> {
        self.fetch(&format!("movie/{id}/videos"), &self.base_params()).await
    }

    /// `tv/{id}`.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError`] if the upstream call fails.
    pub async fn tv_show_details(&self, id: MediaId) -> Result<TvShowDetails, UpstreamError> {
        self.fetch(&format!("tv/{id}"), &self.base_params()).await
    }

    /// `tv/{id}/credits`.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError`] if the upstream call fails.
    pub async fn tv_show_credits(&self, id: MediaId) -> Result<Credits, UpstreamError> {
        self.fetch(&format!("tv/{id}/credits"), &self.base_params()).await
    }

    /// `tv/{id}/recommendations` (first page).
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError`] if the upstream call fails.
    pub async fn tv_show_recommendations(
        &self,
        id: MediaId,
    ) -> Result<Paged<TvShow>, UpstreamError> {
        let params = self.base_params().with("page", 1);
        self.fetch(&format!("tv/{id}/recommendations"), &params).await
    }

    /// `tv/{id}/videos`.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError`] if the upstream call fails.
    pub async fn tv_show_videos(&self, id: MediaId) -> Result<VideoList, UpstreamError> {
        self.fetch(&format!("tv/{id}/videos"), &self.base_params()).await
    }
}

/// Rejects blank search queries before any request is made.
fn non_blank(query: &str) -> Result<&str, CatalogError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(CatalogError::InvalidQuery);
    }
    Ok(trimmed)
}

/// Release-date window for the discover-based movie lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReleaseWindow {
    /// Earliest release date (inclusive).
    pub from: NaiveDate,
    /// Latest release date (inclusive).
    pub until: NaiveDate,
}

impl ReleaseWindow {
    /// One year back to one year ahead of `today`.
    #[must_use]
    pub fn trending(today: NaiveDate) -> Self {
        Self {
            from: one_year_before(today),
            until: today.checked_add_months(Months::new(12)).unwrap_or(today),
        }
    }

    /// One year back to May 1st of next year.
    #[must_use]
    pub fn upcoming(today: NaiveDate) -> Self {
        let until = today
            .year()
            .checked_add(1)
            .and_then(|year| NaiveDate::from_ymd_opt(year, 5, 1))
            .unwrap_or(today);
        Self {
            from: one_year_before(today),
            until,
        }
    }

    /// Adds the discover filters for this window.
    fn apply(self, params: QueryParams) -> QueryParams {
        params
            .with("sort_by", "popularity.desc")
            .with("with_release_type", THEATRICAL_RELEASE_TYPES)
            .with("release_date.gte", self.from.format("%Y-%m-%d"))
            .with("release_date.lte", self.until.format("%Y-%m-%d"))
    }
}

/// Same calendar day a year earlier (Feb 29 clamps to Feb 28).
fn one_year_before(today: NaiveDate) -> NaiveDate {
    today.checked_sub_months(Months::new(12)).unwrap_or(today)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use std::time::Duration;

    use serde_json::json;

    use super::*;
    use crate::tmdb::cache::tests::ManualClock;
    use crate::tmdb::fake::FakeApi;

    fn popular_body() -> serde_json::Value {
        serde_json::from_str(include_str!("../../../../fixtures/tmdb/movie_popular.json")).unwrap()
    }

    fn service(api: FakeApi) -> TmdbService<FakeApi> {
        TmdbService::new(api, Arc::new(TtlCache::default()))
    }

    #[tokio::test]
    async fn test_second_call_is_served_from_cache() {
        // Arrange
        let svc = service(FakeApi::new().ok("movie/popular", popular_body()));

        // Act
        let first = svc.popular_movies(1).await.unwrap();
        let second = svc.popular_movies(1).await.unwrap();

        // Assert
        assert_eq!(first, second);
        assert_eq!(svc.api().call_count(), 1);
        assert_eq!(svc.cache().len(), 1);
    }

    #[tokio::test]
    async fn test_different_pages_are_cached_separately() {
        // Arrange
        let svc = service(FakeApi::new().ok("movie/popular", popular_body()));

        // Act
        svc.popular_movies(1).await.unwrap();
        svc.popular_movies(2).await.unwrap();

        // Assert
        assert_eq!(svc.api().call_count(), 2);
        assert_eq!(svc.cache().len(), 2);
    }

    #[tokio::test]
    async fn test_expired_entry_is_refetched() {
        // Arrange
        let clock = ManualClock::new();
        let cache = Arc::new(TtlCache::with_clock(Duration::from_secs(300), clock.clone()));
        let svc = TmdbService::new(FakeApi::new().ok("movie/popular", popular_body()), cache);
        svc.popular_movies(1).await.unwrap();

        // Act
        clock.advance(Duration::from_secs(300));
        svc.popular_movies(1).await.unwrap();

        // Assert
        assert_eq!(svc.api().call_count(), 2);
    }

    #[tokio::test]
    async fn test_clear_cache_forces_refetch() {
        // Arrange
        let svc = service(FakeApi::new().ok("movie/popular", popular_body()));
        svc.popular_movies(1).await.unwrap();

        // Act
        svc.clear_cache();
        svc.popular_movies(1).await.unwrap();

        // Assert
        assert_eq!(svc.api().call_count(), 2);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        // Arrange
        let svc = service(FakeApi::new().fail("movie/popular", 500));

        // Act
        let first = svc.popular_movies(1).await;
        let second = svc.popular_movies(1).await;

        // Assert
        assert!(matches!(first, Err(CatalogError::Upstream(_))));
        assert!(second.is_err());
        assert_eq!(svc.api().call_count(), 2);
        assert!(svc.cache().is_empty());
    }

    #[tokio::test]
    async fn test_undecodable_payload_is_not_cached() {
        // Arrange
        let svc = service(FakeApi::new().ok("movie/popular", json!({"unexpected": true})));

        // Act
        let result = svc.popular_movies(1).await;

        // Assert
        assert!(matches!(
            result,
            Err(CatalogError::Upstream(UpstreamError::Decode { .. }))
        ));
        assert!(svc.cache().is_empty());
    }

    #[tokio::test]
    async fn test_page_zero_is_rejected_without_request() {
        // Arrange
        let svc = service(FakeApi::new().ok("movie/popular", popular_body()));

        // Act
        let result = svc.popular_movies(0).await;

        // Assert
        assert!(matches!(result, Err(CatalogError::InvalidPage)));
        assert_eq!(svc.api().call_count(), 0);
    }

    #[tokio::test]
    async fn test_blank_search_is_rejected_without_request() {
        // Arrange
        let svc = service(FakeApi::new());

        // Act
        let movies = svc.search_movies("   ", 1).await;
        let shows = svc.search_tv_shows("", 1).await;

        // Assert
        assert!(matches!(movies, Err(CatalogError::InvalidQuery)));
        assert!(matches!(shows, Err(CatalogError::InvalidQuery)));
        assert_eq!(svc.api().call_count(), 0);
    }

    #[tokio::test]
    async fn test_search_movies_params() {
        // Arrange
        let svc = service(FakeApi::new().ok("search/movie", popular_body()));

        // Act
        svc.search_movies(" matrix ", 2).await.unwrap();

        // Assert
        let params = svc.api().last_params("search/movie").unwrap();
        assert_eq!(params.get("query"), Some("matrix"));
        assert_eq!(params.get("page"), Some("2"));
        assert_eq!(params.get("language"), Some("en-US"));
        assert_eq!(params.get("include_adult"), Some("false"));
    }

    #[tokio::test]
    async fn test_trending_tv_params() {
        // Arrange
        let body = json!({"page": 1, "results": [], "total_pages": 0, "total_results": 0});
        let svc = service(FakeApi::new().ok("discover/tv", body));

        // Act
        svc.trending_tv_shows(1).await.unwrap();

        // Assert
        let params = svc.api().last_params("discover/tv").unwrap();
        assert_eq!(params.get("sort_by"), Some("popularity.desc"));
        assert_eq!(params.get("include_null_first_air_dates"), Some("false"));
    }

    #[tokio::test]
    async fn test_upcoming_uses_discover_filters() {
        // Arrange
        let svc = service(FakeApi::new().ok("discover/movie", popular_body()));

        // Act
        svc.upcoming_movies(1).await.unwrap();

        // Assert
        let params = svc.api().last_params("discover/movie").unwrap();
        assert_eq!(params.get("with_release_type"), Some("2|3"));
        assert_eq!(params.get("include_video"), Some("false"));
        assert!(params.get("release_date.gte").is_some());
        assert!(params.get("release_date.lte").unwrap().ends_with("-05-01"));
    }

    #[tokio::test]
    async fn test_movies_by_genre_params() {
        // Arrange
        let svc = service(FakeApi::new().ok("discover/movie", popular_body()));

        // Act
        svc.movies_by_genre(878, 3).await.unwrap();

        // Assert
        let params = svc.api().last_params("discover/movie").unwrap();
        assert_eq!(params.get("with_genres"), Some("878"));
        assert_eq!(params.get("page"), Some("3"));
    }

    #[tokio::test]
    async fn test_custom_language_is_sent() {
        // Arrange
        let svc =
            service(FakeApi::new().ok("tv/popular", popular_tv_body())).with_language("ja-JP");

        // Act
        svc.popular_tv_shows(1).await.unwrap();

        // Assert
        let params = svc.api().last_params("tv/popular").unwrap();
        assert_eq!(params.get("language"), Some("ja-JP"));
    }

    fn popular_tv_body() -> serde_json::Value {
        json!({
            "page": 1,
            "results": [{"id": 1399, "name": "Game of Thrones"}],
            "total_pages": 1,
            "total_results": 1
        })
    }

    #[test]
    fn test_trending_window() {
        // Arrange
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();

        // Act
        let window = ReleaseWindow::trending(today);

        // Assert
        assert_eq!(window.from, NaiveDate::from_ymd_opt(2025, 10, 16).unwrap());
        assert_eq!(window.until, NaiveDate::from_ymd_opt(2027, 10, 16).unwrap());
    }

    #[test]
    fn test_upcoming_window_ends_may_first_next_year() {
        // Arrange
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();

        // Act
        let window = ReleaseWindow::upcoming(today);

        // Assert
        assert_eq!(window.from, NaiveDate::from_ymd_opt(2025, 10, 16).unwrap());
        assert_eq!(window.until, NaiveDate::from_ymd_opt(2027, 5, 1).unwrap());
    }

    #[test]
    fn test_leap_day_window_clamps() {
        // Arrange
        let today = NaiveDate::from_ymd_opt(2028, 2, 29).unwrap();

        // Act
        let window = ReleaseWindow::trending(today);

        // Assert
        assert_eq!(window.from, NaiveDate::from_ymd_opt(2027, 2, 28).unwrap());
        assert_eq!(window.until, NaiveDate::from_ymd_opt(2029, 2, 28).unwrap());
    }
}
