//! On-disk page cache.

use std::io;
use std::path::{Component, Path, PathBuf};

use log::info;

use crate::config::{CACHE_FILE_EXTENSION, CACHE_INDEX_ID};

/// Text blob storage keyed by cache id.
pub trait CacheStore: Send + Sync {
    /// Reads the page stored under `id`. A missing entry is an I/O error.
    fn read(&self, id: &str) -> io::Result<String>;

    /// Stores `content` under `id`, replacing any previous entry.
    fn write(&self, id: &str, content: &str) -> io::Result<()>;

    fn contains(&self, id: &str) -> bool;
}

/// Pages stored as `<dir>/<id>.html`.
#[derive(Debug, Clone)]
pub struct FsCache {
    dir: PathBuf,
}

impl FsCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `id`.
    pub fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.{CACHE_FILE_EXTENSION}"))
    }
}

impl CacheStore for FsCache {
    fn read(&self, id: &str) -> io::Result<String> {
        let path = self.path_for(id);
        let content = std::fs::read_to_string(&path)?;
        info!("Read cached page {}", path.display());
        Ok(content)
    }

    fn write(&self, id: &str, content: &str) -> io::Result<()> {
        let path = self.path_for(id);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, content)?;
        info!("Cached page {} ({} bytes)", path.display(), content.len());
        Ok(())
    }

    fn contains(&self, id: &str) -> bool {
        self.path_for(id).is_file()
    }
}

/// Derives the cache id of a URL path.
///
/// The leading `/` is stripped and a path ending in `/` maps to `index` in that
/// directory: `/` is `index`, `/docs/` is `docs/index`, `/docs/a` is `docs/a`.
///
/// # Errors
///
/// Returns an [`io::ErrorKind::InvalidInput`] error if the path contains `..` or
/// anything else that could leave the cache directory.
pub fn cache_id(path: &str) -> io::Result<String> {
    let trimmed = path.trim_start_matches('/');
    let id = if trimmed.is_empty() {
        CACHE_INDEX_ID.to_string()
    } else if trimmed.ends_with('/') {
        format!("{trimmed}{CACHE_INDEX_ID}")
    } else {
        trimmed.to_string()
    };

    let escapes = Path::new(&id)
        .components()
        .any(|component| !matches!(component, Component::Normal(_)));
    if escapes {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("cache id '{id}' must stay inside the cache directory"),
        ));
    }
    Ok(id)
}
