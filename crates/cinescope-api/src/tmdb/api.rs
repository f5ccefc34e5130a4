//! `TmdbApi` trait definition.
#![allow(clippy::future_not_send)]

use serde_json::Value;

use super::error::UpstreamError;
use super::params::QueryParams;

/// Raw upstream transport.
///
/// The one boundary through which the rest of the crate reaches TMDB. It
/// knows nothing about caching; implementations inject the credential and
/// never retry. Abstracted so the aggregation layer can run against test
/// doubles. Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(TmdbApi: Send)]
pub trait LocalTmdbApi {
    /// Issues a GET for `endpoint` (relative to the base URL) with `params`.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError`] on a non-success status, a transport
    /// failure, or a body that is not JSON.
    async fn request(&self, endpoint: &str, params: &QueryParams) -> Result<Value, UpstreamError>;
}
