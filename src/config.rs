use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::PagetocError;

pub const DEFAULT_CONFIG_FILE: &str = "pagetoc.toml";

/// Settings read from `pagetoc.toml`. Every field has a default, so a
/// missing file is the same as an empty one.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Root of the content tree (`blog/`, `docs/`, ...).
    pub content_dir: PathBuf,
    /// Absolute site origin, used for sitemap entries.
    pub site_url: String,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    /// `0` disables the bound.
    pub max_entries: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from("src/content"),
            site_url: "http://localhost:3000".to_string(),
            cache: CacheConfig::default(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { max_entries: 1024 }
    }
}

impl Config {
    /// Load `path`, or defaults if it does not exist.
    pub fn load(path: &Path) -> Result<Self, PagetocError> {
        let text = match fs::read_to_string(path) {
            Ok(t) => t,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(PagetocError::io(path, e)),
        };
        Self::parse(&text).map_err(|reason| PagetocError::Config {
            path: path.to_path_buf(),
            reason,
        })
    }

    pub fn parse(text: &str) -> Result<Self, String> {
        toml::from_str(text).map_err(|e| e.message().to_string())
    }

    /// The configured cache, or an unbounded one when `max_entries` is 0.
    #[must_use]
    pub fn toc_cache(&self) -> crate::cache::TocCache {
        match self.cache.max_entries {
            0 => crate::cache::TocCache::new(),
            n => crate::cache::TocCache::with_capacity_limit(n),
        }
    }
}
