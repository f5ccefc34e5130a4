//! TMDB client module.
//!
//! Wraps the TMDB v3 REST API behind a swappable transport, a TTL response
//! cache and a cached catalog service, and aggregates detail pages from
//! concurrent sub-fetches.

mod aggregate;
mod api;
mod cache;
mod client;
mod error;
#[cfg(test)]
mod fake;
mod images;
mod metrics;
mod params;
mod service;
mod similarity;
mod types;

pub use aggregate::{
    DetailView, MAX_CAST, MovieView, TvShowView, movie_detail_view, select_trailer,
    tv_show_detail_view,
};
#[allow(clippy::module_name_repetitions)]
pub use api::{LocalTmdbApi, TmdbApi};
pub use cache::{Clock, DEFAULT_TTL, SystemClock, TtlCache};
#[allow(clippy::module_name_repetitions)]
pub use client::{DEFAULT_BASE_URL, TmdbClient, TmdbClientBuilder};
pub use error::{CatalogError, DetailError, UpstreamError};
pub use images::{DEFAULT_IMAGE_BASE_URL, ImageUrls};
pub use params::{DEFAULT_LANGUAGE, MediaId, QueryParams, RequestKey};
#[allow(clippy::module_name_repetitions)]
pub use service::{ReleaseWindow, TmdbService};
pub use similarity::{MAX_RELATED, rank_similar};
#[allow(clippy::module_name_repetitions)]
pub use types::{
    CastMember, Company, Creator, Credits, CrewMember, Genre, GenreList, Movie, MovieDetails,
    Paged, SeasonSummary, SpokenLanguage, Titled, TmdbErrorResponse, TrendingItem, TvShow,
    TvShowDetails, Video, VideoList,
};
