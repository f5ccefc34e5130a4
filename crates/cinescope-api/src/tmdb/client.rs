//! `TmdbClient` - HTTP adapter for the TMDB v3 API.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::Value;
use tracing::instrument;
use url::Url;

use super::api::LocalTmdbApi;
use super::error::UpstreamError;
use super::params::QueryParams;
use super::types::TmdbErrorResponse;

/// Default base URL for TMDB API v3.
pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";

/// Name of the credential query parameter injected into every request.
const API_KEY_PARAM: &str = "api_key";

/// TMDB API client.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests (always ends with `/`).
    base_url: Url,
    /// API key sent as the `api_key` query parameter.
    api_key: String,
}

/// Builder for `TmdbClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClientBuilder {
    base_url: Option<Url>,
    api_key: Option<String>,
    user_agent: Option<String>,
    timeout: Option<Duration>,
}

impl TmdbClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            api_key: None,
            user_agent: None,
            timeout: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests, or `TMDB_BASE_URL`).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the API key (required).
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets a transport timeout (default: none).
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `api_key` is not set.
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<TmdbClient> {
        let api_key = self.api_key.context("api_key is required")?;
        let user_agent = self.user_agent.context("user_agent is required")?;

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            let result = Url::parse(DEFAULT_BASE_URL);
            result.context("invalid default base URL")?
        };

        let mut builder = Client::builder().user_agent(&user_agent).gzip(true);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build().context("failed to build HTTP client")?;

        Ok(TmdbClient {
            http_client,
            base_url: with_trailing_slash(base_url),
            api_key,
        })
    }
}

/// `Url::join` drops the last path segment unless the base ends with `/`.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

impl TmdbClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> TmdbClientBuilder {
        TmdbClientBuilder::new()
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Turns a non-success response body into an error message.
    fn error_message(body: &str) -> String {
        serde_json::from_str::<TmdbErrorResponse>(body).map_or_else(
            |_| String::from(body),
            |error_response| {
                format!(
                    "code={}, message={}",
                    error_response.status_code, error_response.status_message
                )
            },
        )
    }
}

impl LocalTmdbApi for TmdbClient {
    #[instrument(skip_all, fields(endpoint = endpoint))]
    async fn request(&self, endpoint: &str, params: &QueryParams) -> Result<Value, UpstreamError> {
        let path = endpoint.trim_start_matches('/');
        let url = self
            .base_url
            .join(path)
            .map_err(|source| UpstreamError::Url {
                endpoint: String::from(endpoint),
                source,
            })?;

        let query: Vec<(&str, &str)> = params
            .iter()
            .filter(|(k, _)| *k != API_KEY_PARAM)
            .chain(std::iter::once((API_KEY_PARAM, self.api_key.as_str())))
            .collect();

        let transport = |source| UpstreamError::Transport {
            endpoint: String::from(endpoint),
            source,
        };

        let request = self
            .http_client
            .get(url)
            .query(&query)
            .build()
            .map_err(transport)?;

        tracing::debug!(path = %request.url().path(), "TMDB API request");

        let response = self.http_client.execute(request).await.map_err(transport)?;
        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<failed to read body>"));
            return Err(UpstreamError::Status {
                endpoint: String::from(endpoint),
                status: status.as_u16(),
                message: Self::error_message(&body),
            });
        }

        let body = response.text().await.map_err(transport)?;
        serde_json::from_str(&body).map_err(|source| UpstreamError::Decode {
            endpoint: String::from(endpoint),
            source,
        })
    }
}
