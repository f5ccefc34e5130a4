//! `AppConfig` struct and TOML loading.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Default response cache lifetime in seconds.
const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// TMDB connection settings.
    #[serde(default)]
    pub tmdb: TmdbConfig,
    /// Sign-in settings.
    #[serde(default)]
    pub auth: AuthConfig,
}

/// `[tmdb]` section.
#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct TmdbConfig {
    /// API base URL (default: TMDB v3).
    #[serde(default)]
    pub base_url: Option<String>,
    /// Image CDN base URL.
    #[serde(default)]
    pub image_base_url: Option<String>,
    /// Response language (default: `en-US`).
    #[serde(default)]
    pub language: Option<String>,
    /// Response cache lifetime in seconds.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    /// Transport timeout in seconds (default: none).
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

const fn default_cache_ttl_secs() -> u64 {
    DEFAULT_CACHE_TTL_SECS
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            image_base_url: None,
            language: None,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            timeout_secs: None,
        }
    }
}

impl TmdbConfig {
    /// Cache lifetime as a `Duration`.
    pub const fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Transport timeout as a `Duration`.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Identity provider selection.
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Fixed demo identity, no network.
    #[default]
    Demo,
    /// Firebase Auth email/password.
    Firebase,
}

/// `[auth]` section.
#[derive(Debug, Deserialize, Default, PartialEq, Eq)]
pub struct AuthConfig {
    /// Which provider signs users in.
    #[serde(default)]
    pub provider: ProviderKind,
    /// Refuse catalog commands unless signed in.
    #[serde(default)]
    pub required: bool,
    /// Identity Toolkit base URL override (emulator).
    #[serde(default)]
    pub firebase_base_url: Option<String>,
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Applies `TMDB_BASE_URL` / `TMDB_IMAGE_BASE_URL` overrides.
    #[must_use]
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup("TMDB_BASE_URL").filter(|v| !v.is_empty()) {
            self.tmdb.base_url = Some(url);
        }
        if let Some(url) = lookup("TMDB_IMAGE_BASE_URL").filter(|v| !v.is_empty()) {
            self.tmdb.image_base_url = Some(url);
        }
        self
    }
}
