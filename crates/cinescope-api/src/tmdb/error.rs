//! Error kinds surfaced by the HTTP adapters, catalog and aggregation layers.

use thiserror::Error;

/// A single upstream call failed.
///
/// Produced only by the HTTP adapter (or by the cached service when a cached
/// or fresh payload does not decode). Never retried.
#[derive(Debug, Error)]
#[allow(clippy::module_name_repetitions)]
pub enum UpstreamError {
    /// The upstream answered with a non-success status.
    #[error("upstream error (HTTP {status}) on {endpoint}: {message}")]
    Status {
        /// Endpoint path that was requested.
        endpoint: String,
        /// HTTP status code.
        status: u16,
        /// `status_message` from the error body, or the raw body.
        message: String,
    },

    /// The request never produced a response (connect error, timeout, ...).
    #[error("request failed: {endpoint}")]
    Transport {
        /// Endpoint path that was requested.
        endpoint: String,
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The response body was not the expected JSON.
    #[error("failed to decode JSON response: {endpoint}")]
    Decode {
        /// Endpoint path that was requested.
        endpoint: String,
        /// Underlying decode error.
        #[source]
        source: serde_json::Error,
    },

    /// The endpoint could not be joined onto the base URL.
    #[error("failed to join URL path: {endpoint}")]
    Url {
        /// Endpoint path that was requested.
        endpoint: String,
        /// Underlying parse error.
        #[source]
        source: url::ParseError,
    },
}

impl UpstreamError {
    /// Endpoint path of the failed call.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        match self {
            Self::Status { endpoint, .. }
            | Self::Transport { endpoint, .. }
            | Self::Decode { endpoint, .. }
            | Self::Url { endpoint, .. } => endpoint,
        }
    }

    /// HTTP status, if the upstream answered at all.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Failure of a detail-page aggregation.
#[derive(Debug, Error)]
#[allow(clippy::module_name_repetitions)]
pub enum DetailError {
    /// The identifier is not a positive integer. No network call was made.
    #[error("invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    /// A mandatory sub-fetch (details, credits, recommendations) failed.
    #[error("failed to load {kind} details")]
    Aggregation {
        /// `"movie"` or `"tv show"`.
        kind: &'static str,
        /// First upstream error encountered.
        #[source]
        source: UpstreamError,
    },
}

impl DetailError {
    /// The wrapped upstream error, if any.
    #[must_use]
    pub const fn upstream(&self) -> Option<&UpstreamError> {
        match self {
            Self::InvalidIdentifier(_) => None,
            Self::Aggregation { source, .. } => Some(source),
        }
    }
}

/// Failure of a paged catalog request.
#[derive(Debug, Error)]
#[allow(clippy::module_name_repetitions)]
pub enum CatalogError {
    /// Search was attempted with an empty query. No network call was made.
    #[error("search query is required")]
    InvalidQuery,

    /// Page numbers are 1-based.
    #[error("page must be at least 1")]
    InvalidPage,

    /// The upstream call failed.
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}
