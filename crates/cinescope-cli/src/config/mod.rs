//! Application configuration module.
//!
//! Manages the TOML config file holding TMDB connection settings and the
//! identity provider selection. Secrets come from the environment only.

#[allow(clippy::module_inception)]
mod config;
mod paths;

pub use config::{AppConfig, ProviderKind};
pub use paths::resolve_config_path;
