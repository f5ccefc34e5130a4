//! Detail-page aggregation.
//!
//! A detail view combines four sub-fetches issued concurrently: details,
//! credits and recommendations are mandatory, the video lookup is
//! best-effort and only feeds trailer selection.

use futures::future;
use tracing::instrument;

use super::api::LocalTmdbApi;
use super::error::{DetailError, UpstreamError};
use super::params::MediaId;
use super::service::TmdbService;
use super::similarity::rank_similar;
use super::types::{
    CastMember, Credits, Movie, MovieDetails, Paged, Titled, TvShow, TvShowDetails, Video,
    VideoList,
};

/// Maximum number of cast members on a detail view.
pub const MAX_CAST: usize = 10;

const TRAILER_TYPE: &str = "Trailer";
const TRAILER_SITE: &str = "YouTube";

/// Everything a detail page shows.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailView<D, R> {
    /// The primary entity.
    pub details: D,
    /// Recommendations ranked by title similarity (at most 6).
    pub related: Vec<R>,
    /// Leading cast in billing order (at most [`MAX_CAST`]).
    pub cast: Vec<CastMember>,
    /// First YouTube trailer, if any was found.
    pub trailer: Option<Video>,
}

/// Movie detail page.
pub type MovieView = DetailView<MovieDetails, Movie>;

/// TV show detail page.
pub type TvShowView = DetailView<TvShowDetails, TvShow>;

/// First video whose type is exactly `Trailer` hosted on exactly `YouTube`.
#[must_use]
pub fn select_trailer(videos: &[Video]) -> Option<&Video> {
    videos
        .iter()
        .find(|v| v.kind == TRAILER_TYPE && v.site == TRAILER_SITE)
}

/// Builds the movie detail view for `raw_id`.
///
/// # Errors
///
/// - [`DetailError::InvalidIdentifier`] if `raw_id` is not a positive
///   integer. Nothing is fetched.
/// - [`DetailError::Aggregation`] with the first failing mandatory sub-fetch.
#[instrument(skip(service))]
pub async fn movie_detail_view<A: LocalTmdbApi + Sync>(
    service: &TmdbService<A>,
    raw_id: &str,
) -> Result<MovieView, DetailError> {
    let id = MediaId::parse(raw_id)?;

    let mandatory = async {
        futures::try_join!(
            service.movie_details(id),
            service.movie_credits(id),
            service.movie_recommendations(id),
        )
    };
    let (mandatory, videos) =
        future::join(mandatory, best_effort(service.movie_videos(id))).await;
    let (details, credits, recommendations) =
        mandatory.map_err(|source| DetailError::Aggregation {
            kind: "movie",
            source,
        })?;

    Ok(assemble(details, credits, recommendations, videos))
}

/// Builds the TV show detail view for `raw_id`.
///
/// # Errors
///
/// - [`DetailError::InvalidIdentifier`] if `raw_id` is not a positive
///   integer. Nothing is fetched.
/// - [`DetailError::Aggregation`] with the first failing mandatory sub-fetch.
#[instrument(skip(service))]
pub async fn tv_show_detail_view<A: LocalTmdbApi + Sync>(
    service: &TmdbService<A>,
    raw_id: &str,
) -> Result<TvShowView, DetailError> {
    let id = MediaId::parse(raw_id)?;

    let mandatory = async {
        futures::try_join!(
            service.tv_show_details(id),
            service.tv_show_credits(id),
            service.tv_show_recommendations(id),
        )
    };
    let (mandatory, videos) =
        future::join(mandatory, best_effort(service.tv_show_videos(id))).await;
    let (details, credits, recommendations) =
        mandatory.map_err(|source| DetailError::Aggregation {
            kind: "tv show",
            source,
        })?;

    Ok(assemble(details, credits, recommendations, videos))
}

/// Swallows a video lookup failure; the page renders without a trailer.
async fn best_effort(
    videos: impl Future<Output = Result<VideoList, UpstreamError>>,
) -> Option<VideoList> {
    match videos.await {
        Ok(list) => Some(list),
        Err(err) => {
            tracing::warn!(error = %err, "video lookup failed, continuing without trailer");
            None
        }
    }
}

fn assemble<D: Titled, R: Titled>(
    details: D,
    credits: Credits,
    recommendations: Paged<R>,
    videos: Option<VideoList>,
) -> DetailView<D, R> {
    let related = rank_similar(recommendations.results, details.display_title());
    let mut cast = credits.cast;
    cast.truncate(MAX_CAST);
    let trailer = videos.and_then(|list| select_trailer(&list.results).cloned());

    DetailView {
        details,
        related,
        cast,
        trailer,
    }
}
