//! API library for cinescope.
//!
//! Provides the cached TMDB catalog client with detail-page aggregation, and
//! the identity providers used to gate the catalog.

/// Sign-in providers.
pub mod identity;

/// TMDB API client.
pub mod tmdb;
