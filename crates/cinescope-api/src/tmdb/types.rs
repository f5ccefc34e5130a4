//! TMDB response types.
//!
//! Only the fields this application reads are modelled; everything else in
//! the upstream payload is ignored on decode.

use serde::{Deserialize, Serialize};

/// Anything with a display title that the similarity ranking can compare.
pub trait Titled {
    /// Display title (`title` for movies, `name` for TV shows).
    fn display_title(&self) -> &str;
}

// --- Paged lists ---

/// A page of results (`movie/popular`, `search/tv`, `discover/movie`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paged<T> {
    /// Current page number (1-based).
    pub page: u32,
    /// Results on this page.
    pub results: Vec<T>,
    /// Total number of pages.
    #[serde(default)]
    pub total_pages: u32,
    /// Total number of results.
    #[serde(default)]
    pub total_results: u32,
}

// --- Movies ---

/// A movie as it appears in lists and recommendations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    pub title: String,
    /// Overview text.
    #[serde(default)]
    pub overview: Option<String>,
    /// Poster image path.
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Backdrop image path.
    #[serde(default)]
    pub backdrop_path: Option<String>,
    /// Release date (YYYY-MM-DD, may be empty).
    #[serde(default)]
    pub release_date: Option<String>,
    /// Vote average.
    #[serde(default)]
    pub vote_average: f64,
    /// Vote count.
    #[serde(default)]
    pub vote_count: u32,
    /// Genre IDs.
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    /// Popularity score.
    #[serde(default)]
    pub popularity: f64,
}

impl Titled for Movie {
    fn display_title(&self) -> &str {
        &self.title
    }
}

/// Response from `movie/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetails {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    pub title: String,
    /// Overview text.
    #[serde(default)]
    pub overview: Option<String>,
    /// Tagline.
    #[serde(default)]
    pub tagline: Option<String>,
    /// Poster image path.
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Backdrop image path.
    #[serde(default)]
    pub backdrop_path: Option<String>,
    /// Release date.
    #[serde(default)]
    pub release_date: Option<String>,
    /// Runtime in minutes.
    #[serde(default)]
    pub runtime: Option<u32>,
    /// Release status (e.g., "Released").
    #[serde(default)]
    pub status: Option<String>,
    /// Vote average.
    #[serde(default)]
    pub vote_average: f64,
    /// Vote count.
    #[serde(default)]
    pub vote_count: u32,
    /// Budget in USD.
    #[serde(default)]
    pub budget: u64,
    /// Revenue in USD.
    #[serde(default)]
    pub revenue: u64,
    /// Homepage URL.
    #[serde(default)]
    pub homepage: Option<String>,
    /// Genres.
    #[serde(default)]
    pub genres: Vec<Genre>,
    /// Production companies.
    #[serde(default)]
    pub production_companies: Vec<Company>,
    /// Spoken languages.
    #[serde(default)]
    pub spoken_languages: Vec<SpokenLanguage>,
}

impl Titled for MovieDetails {
    fn display_title(&self) -> &str {
        &self.title
    }
}

// --- TV shows ---

/// A TV show as it appears in lists and recommendations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TvShow {
    /// TMDB series ID.
    pub id: u64,
    /// Localized name.
    pub name: String,
    /// Original name.
    #[serde(default)]
    pub original_name: Option<String>,
    /// Overview text.
    #[serde(default)]
    pub overview: Option<String>,
    /// Poster image path.
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Backdrop image path.
    #[serde(default)]
    pub backdrop_path: Option<String>,
    /// First air date.
    #[serde(default)]
    pub first_air_date: Option<String>,
    /// Vote average.
    #[serde(default)]
    pub vote_average: f64,
    /// Vote count.
    #[serde(default)]
    pub vote_count: u32,
    /// Genre IDs.
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    /// Popularity score.
    #[serde(default)]
    pub popularity: f64,
    /// Origin countries (ISO 3166-1).
    #[serde(default)]
    pub origin_country: Vec<String>,
    /// Original language (ISO 639-1).
    #[serde(default)]
    pub original_language: Option<String>,
}

impl Titled for TvShow {
    fn display_title(&self) -> &str {
        &self.name
    }
}

/// Response from `tv/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TvShowDetails {
    /// TMDB series ID.
    pub id: u64,
    /// Localized name.
    pub name: String,
    /// Overview text.
    #[serde(default)]
    pub overview: Option<String>,
    /// Poster image path.
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Backdrop image path.
    #[serde(default)]
    pub backdrop_path: Option<String>,
    /// First air date.
    #[serde(default)]
    pub first_air_date: Option<String>,
    /// Last air date.
    #[serde(default)]
    pub last_air_date: Option<String>,
    /// Status (e.g., "Returning Series", "Ended").
    #[serde(default)]
    pub status: Option<String>,
    /// Whether the show is still in production.
    #[serde(default)]
    pub in_production: bool,
    /// Total number of seasons.
    #[serde(default)]
    pub number_of_seasons: u32,
    /// Total number of episodes.
    #[serde(default)]
    pub number_of_episodes: u32,
    /// Vote average.
    #[serde(default)]
    pub vote_average: f64,
    /// Genres.
    #[serde(default)]
    pub genres: Vec<Genre>,
    /// Networks.
    #[serde(default)]
    pub networks: Vec<Company>,
    /// Creators.
    #[serde(default)]
    pub created_by: Vec<Creator>,
    /// Seasons.
    #[serde(default)]
    pub seasons: Vec<SeasonSummary>,
}

impl Titled for TvShowDetails {
    fn display_title(&self) -> &str {
        &self.name
    }
}

/// Season summary within TV details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonSummary {
    /// TMDB season ID.
    pub id: u64,
    /// Season name.
    pub name: String,
    /// Season number (0 = specials).
    pub season_number: u32,
    /// Number of episodes.
    #[serde(default)]
    pub episode_count: u32,
    /// Air date.
    #[serde(default)]
    pub air_date: Option<String>,
}

/// Series creator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creator {
    /// TMDB person ID.
    pub id: u64,
    /// Name.
    pub name: String,
    /// Profile image path.
    #[serde(default)]
    pub profile_path: Option<String>,
}

// --- Shared ---

/// Genre.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    /// Genre ID.
    pub id: u32,
    /// Genre name.
    pub name: String,
}

/// Response from `genre/movie/list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreList {
    /// All genres.
    pub genres: Vec<Genre>,
}

/// Production company or network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    /// Company ID.
    pub id: u64,
    /// Company name.
    pub name: String,
    /// Logo image path.
    #[serde(default)]
    pub logo_path: Option<String>,
}

/// Spoken language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpokenLanguage {
    /// English name.
    pub english_name: String,
    /// ISO 639-1 code.
    pub iso_639_1: String,
}

// --- Credits ---

/// Response from `movie/{id}/credits` and `tv/{id}/credits`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credits {
    /// Entity ID.
    #[serde(default)]
    pub id: u64,
    /// Cast, in billing order.
    #[serde(default)]
    pub cast: Vec<CastMember>,
    /// Crew.
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

/// A cast member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastMember {
    /// TMDB person ID.
    pub id: u64,
    /// Name.
    pub name: String,
    /// Character played.
    #[serde(default)]
    pub character: Option<String>,
    /// Profile image path.
    #[serde(default)]
    pub profile_path: Option<String>,
    /// Billing order.
    #[serde(default)]
    pub order: u32,
}

/// A crew member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrewMember {
    /// TMDB person ID.
    pub id: u64,
    /// Name.
    pub name: String,
    /// Job title.
    #[serde(default)]
    pub job: Option<String>,
    /// Department.
    #[serde(default)]
    pub department: Option<String>,
    /// Profile image path.
    #[serde(default)]
    pub profile_path: Option<String>,
}

// --- Videos ---

/// Response from `movie/{id}/videos` and `tv/{id}/videos`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoList {
    /// Videos in upstream order.
    #[serde(default)]
    pub results: Vec<Video>,
}

/// A video reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    /// Site-specific key (YouTube video ID).
    pub key: String,
    /// Hosting site ("YouTube", "Vimeo").
    pub site: String,
    /// Video type ("Trailer", "Teaser", "Clip", ...).
    #[serde(rename = "type")]
    pub kind: String,
    /// Title.
    #[serde(default)]
    pub name: Option<String>,
}

// --- Trending ---

/// One item of `trending/all/day`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "media_type", rename_all = "lowercase")]
pub enum TrendingItem {
    /// A movie.
    Movie(Movie),
    /// A TV show.
    Tv(TvShow),
    /// People and any future media type.
    #[serde(other)]
    Other,
}

impl TrendingItem {
    /// Display title, if the item is a movie or TV show.
    #[must_use]
    pub fn display_title(&self) -> Option<&str> {
        match self {
            Self::Movie(m) => Some(m.display_title()),
            Self::Tv(t) => Some(t.display_title()),
            Self::Other => None,
        }
    }
}

// --- Errors ---

/// TMDB error body.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbErrorResponse {
    /// TMDB status code.
    pub status_code: u32,
    /// Human-readable message.
    pub status_message: String,
    /// Always `false`.
    #[serde(default)]
    pub success: bool,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use super::*;

    #[test]
    fn test_parse_popular_movies_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/tmdb/movie_popular.json");

        // Act
        let page: Paged<Movie> = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.results.len(), 3);
        assert_eq!(page.results[0].title, "The Matrix");
    }

    #[test]
    fn test_parse_movie_details_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/tmdb/movie_details_604.json");

        // Act
        let details: MovieDetails = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(details.id, 604);
        assert_eq!(details.display_title(), "The Matrix Reloaded");
        assert_eq!(details.runtime, Some(138));
        assert!(!details.genres.is_empty());
    }

    #[test]
    fn test_parse_tv_details_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/tmdb/tv_details_1399.json");

        // Act
        let details: TvShowDetails = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(details.id, 1399);
        assert_eq!(details.name, "Game of Thrones");
        assert_eq!(details.number_of_seasons, 8);
        assert!(!details.seasons.is_empty());
    }

    #[test]
    fn test_parse_video_type_field() {
        // Arrange
        let json = r#"{"results":[{"key":"abc","site":"YouTube","type":"Trailer","name":"Official"}]}"#;

        // Act
        let videos: VideoList = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(videos.results[0].kind, "Trailer");
    }

    #[test]
    fn test_parse_trending_all_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/tmdb/trending_all.json");

        // Act
        let page: Paged<TrendingItem> = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(page.results.len(), 3);
        assert!(matches!(page.results[0], TrendingItem::Movie(_)));
        assert!(matches!(page.results[1], TrendingItem::Tv(_)));
        assert_eq!(page.results[2], TrendingItem::Other);
        assert_eq!(page.results[1].display_title(), Some("Severance"));
    }

    #[test]
    fn test_parse_error_response() {
        // Arrange
        let json = r#"{"status_code":7,"status_message":"Invalid API key: You must be granted a valid key.","success":false}"#;

        // Act
        let error: TmdbErrorResponse = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(error.status_code, 7);
        assert!(!error.success);
        assert!(error.status_message.contains("Invalid API key"));
    }
}
