//! Process environment settings.
//!
//! Read once, on first access, and never re-read per call.

use std::path::PathBuf;
use std::sync::LazyLock;

use super::constants::{CACHE_DIR_ENV, CACHE_ENV, DEFAULT_CACHE_DIR};

/// Settings taken from the process environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Whether the scraper persists and serves pages from the on-disk cache.
    pub cache_enabled: bool,
    /// Directory holding cached pages.
    pub cache_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cache_enabled: false,
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
        }
    }
}

impl Settings {
    /// Builds settings from `INTERFETCH_CACHE` and `INTERFETCH_CACHE_DIR`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let cache_enabled = lookup(CACHE_ENV).map(|v| parse_flag(&v)).unwrap_or(false);
        let cache_dir = lookup(CACHE_DIR_ENV)
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_DIR));

        Self {
            cache_enabled,
            cache_dir,
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

static SETTINGS: LazyLock<Settings> = LazyLock::new(|| {
    let settings = Settings::from_env();
    log::debug!(
        "Loaded settings: cache_enabled={}, cache_dir={}",
        settings.cache_enabled,
        settings.cache_dir.display()
    );
    settings
});

/// Returns the process-wide settings, reading the environment on first use.
pub fn settings() -> &'static Settings {
    &SETTINGS
}
