//! Image URL construction.

/// Default TMDB image CDN base.
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

const POSTER_SIZE: &str = "w500";
const BACKDROP_SIZE: &str = "w1280";
const PROFILE_SIZE: &str = "w185";

const POSTER_PLACEHOLDER: &str = "/placeholder-movie.jpg";
const BACKDROP_PLACEHOLDER: &str = "/placeholder-backdrop.jpg";
const PROFILE_PLACEHOLDER: &str = "/placeholder-profile.jpg";

/// Builds poster, backdrop and profile URLs from TMDB image paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUrls {
    base_url: String,
}

impl Default for ImageUrls {
    fn default() -> Self {
        Self::new(DEFAULT_IMAGE_BASE_URL)
    }
}

impl ImageUrls {
    /// Uses `base_url` (trailing `/` is ignored).
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }

    /// Poster at `w500`, or the movie placeholder.
    #[must_use]
    pub fn poster_url(&self, path: Option<&str>) -> String {
        self.sized(POSTER_SIZE, path, POSTER_PLACEHOLDER)
    }

    /// Backdrop at `w1280`, or the backdrop placeholder.
    #[must_use]
    pub fn backdrop_url(&self, path: Option<&str>) -> String {
        self.sized(BACKDROP_SIZE, path, BACKDROP_PLACEHOLDER)
    }

    /// Profile photo at `w185`, or the profile placeholder.
    #[must_use]
    pub fn profile_url(&self, path: Option<&str>) -> String {
        self.sized(PROFILE_SIZE, path, PROFILE_PLACEHOLDER)
    }

    fn sized(&self, size: &str, path: Option<&str>, placeholder: &str) -> String {
        match path.filter(|p| !p.is_empty()) {
            Some(p) => format!("{}/{size}/{}", self.base_url, p.trim_start_matches('/')),
            None => String::from(placeholder),
        }
    }
}
