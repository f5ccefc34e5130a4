//! Query parameters, cache keys and entity identifiers.

use std::collections::BTreeMap;
use std::fmt;
use std::num::NonZeroU64;

use super::error::DetailError;

/// Default response language for every catalog request.
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Query parameters for one upstream request.
///
/// Backed by an ordered map, so iteration (and therefore the derived
/// [`RequestKey`]) does not depend on insertion order. Setting a key twice
/// keeps the last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    entries: BTreeMap<String, String>,
}

impl QueryParams {
    /// Creates an empty parameter set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Adds (or replaces) a parameter.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.insert(key, value);
        self
    }

    /// Adds (or replaces) a parameter in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) {
        self.entries.insert(key.into(), value.to_string());
    }

    /// Returns the value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Iterates parameters in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no parameters are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

/// Normalized cache key: `"{endpoint}?{k1}={v1}&{k2}={v2}"`, keys ascending.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestKey(String);

impl RequestKey {
    /// Derives the key for a request.
    #[must_use]
    pub fn new(endpoint: &str, params: &QueryParams) -> Self {
        let query = params
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");
        Self(format!("{endpoint}?{query}"))
    }

    /// The key as a string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Positive TMDB entity identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MediaId(NonZeroU64);

impl MediaId {
    /// Parses an identifier as received from a route or CLI argument.
    ///
    /// # Errors
    ///
    /// Returns [`DetailError::InvalidIdentifier`] unless `raw` is a positive
    /// integer (surrounding whitespace is ignored).
    pub fn parse(raw: &str) -> Result<Self, DetailError> {
        raw.trim()
            .parse::<u64>()
            .ok()
            .and_then(NonZeroU64::new)
            .map(Self)
            .ok_or_else(|| DetailError::InvalidIdentifier(String::from(raw)))
    }

    /// The raw numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

impl TryFrom<i64> for MediaId {
    type Error = DetailError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u64::try_from(value)
            .ok()
            .and_then(NonZeroU64::new)
            .map(Self)
            .ok_or_else(|| DetailError::InvalidIdentifier(value.to_string()))
    }
}

impl fmt::Display for MediaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_request_key_sorts_params() {
        // Arrange
        let params = QueryParams::new()
            .with("page", 2)
            .with("language", DEFAULT_LANGUAGE)
            .with("include_adult", false);

        // Act
        let key = RequestKey::new("search/movie", &params);

        // Assert
        assert_eq!(
            key.as_str(),
            "search/movie?include_adult=false&language=en-US&page=2"
        );
    }

    #[test]
    fn test_request_key_is_order_independent() {
        // Arrange
        let pairs = [
            ("query", "matrix"),
            ("page", "1"),
            ("language", "en-US"),
            ("region", "US"),
        ];
        let forward: QueryParams = pairs.iter().copied().collect();
        let backward: QueryParams = pairs.iter().rev().copied().collect();
        let rotated: QueryParams = pairs.iter().cycle().skip(2).take(4).copied().collect();

        // Act
        let a = RequestKey::new("search/movie", &forward);
        let b = RequestKey::new("search/movie", &backward);
        let c = RequestKey::new("search/movie", &rotated);

        // Assert
        assert_eq!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn test_request_key_differs_by_endpoint_and_value() {
        // Arrange
        let page1 = QueryParams::new().with("page", 1);
        let page2 = QueryParams::new().with("page", 2);

        // Act & Assert
        assert_ne!(
            RequestKey::new("movie/popular", &page1),
            RequestKey::new("movie/top_rated", &page1)
        );
        assert_ne!(
            RequestKey::new("movie/popular", &page1),
            RequestKey::new("movie/popular", &page2)
        );
    }

    #[test]
    fn test_request_key_without_params() {
        // Arrange & Act
        let key = RequestKey::new("genre/movie/list", &QueryParams::new());

        // Assert
        assert_eq!(key.to_string(), "genre/movie/list?");
    }

    #[test]
    fn test_params_last_value_wins() {
        // Arrange & Act
        let params = QueryParams::new().with("page", 1).with("page", 3);

        // Assert
        assert_eq!(params.len(), 1);
        assert_eq!(params.get("page"), Some("3"));
    }

    #[test]
    fn test_media_id_accepts_positive_integers() {
        // Arrange & Act & Assert
        assert_eq!(MediaId::parse("603").unwrap().get(), 603);
        assert_eq!(MediaId::parse(" 1399 ").unwrap().get(), 1399);
        assert_eq!(MediaId::try_from(42_i64).unwrap().get(), 42);
    }

    #[test]
    fn test_media_id_rejects_invalid_input() {
        // Arrange
        let inputs = ["-1", "0", "NaN", "abc", "", "1.5", "12abc"];

        // Act & Assert
        for input in inputs {
            let err = MediaId::parse(input).unwrap_err();
            assert!(
                matches!(err, DetailError::InvalidIdentifier(ref raw) if raw == input),
                "expected InvalidIdentifier for {input:?}"
            );
        }
        assert!(MediaId::try_from(0_i64).is_err());
        assert!(MediaId::try_from(-7_i64).is_err());
    }
}
