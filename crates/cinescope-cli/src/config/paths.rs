//! Config file location.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

const APP_DIR: &str = "cinescope";
const CONFIG_FILE: &str = "config.toml";

/// Resolves the config file path, first match wins:
///
/// 1. `{dir}/config.toml` when `--dir` is given.
/// 2. `$XDG_CONFIG_HOME/cinescope/config.toml` when set to an absolute path.
/// 3. `$HOME/.config/cinescope/config.toml`.
///
/// Environment variables are read through `lookup`; empty values count as unset.
///
/// # Errors
///
/// Returns an error if neither `--dir`, `XDG_CONFIG_HOME` nor `HOME` gives a
/// location.
pub fn resolve_config_path(
    dir: Option<&PathBuf>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<PathBuf> {
    if let Some(d) = dir {
        return Ok(d.join(CONFIG_FILE));
    }

    let var = |key: &str| lookup(key).filter(|v| !v.is_empty()).map(PathBuf::from);
    let base = match var("XDG_CONFIG_HOME").filter(|p| p.is_absolute()) {
        Some(xdg) => xdg,
        None => match var("HOME") {
            Some(home) => home.join(".config"),
            None => bail!("cannot locate config: set --dir, XDG_CONFIG_HOME or HOME"),
        },
    };
    Ok(in_config_home(&base))
}

fn in_config_home(base: &Path) -> PathBuf {
    base.join(APP_DIR).join(CONFIG_FILE)
}
