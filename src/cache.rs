//! Per-source cache of reading progress, typography overrides and bookmarks.
//!
//! Entries live under `<cache_dir>/<sha256 of the source path>/` so any path
//! maps to a safe directory name. Each entry is a tiny TOML file. Write
//! failures are logged and otherwise ignored; a reader must keep working
//! without its cache.

use pager_core::{PageBookmark, ReadingProgress};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Font settings remembered for one source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TypographyOverride {
    pub font_size: u32,
    pub line_height: f32,
}

/// TOML needs a table at the top level, so the list is wrapped.
#[derive(Debug, Default, Serialize, Deserialize)]
struct BookmarkFile {
    #[serde(default)]
    bookmarks: Vec<PageBookmark>,
}

pub fn hash_dir(cache_dir: &Path, source_path: &Path) -> PathBuf {
    let mut hasher = Sha256::new();
    hasher.update(source_path.as_os_str().to_string_lossy().as_bytes());
    let hash = format!("{:x}", hasher.finalize());
    cache_dir.join(hash)
}

fn progress_path(cache_dir: &Path, source_path: &Path) -> PathBuf {
    hash_dir(cache_dir, source_path).join("progress.toml")
}

fn typography_path(cache_dir: &Path, source_path: &Path) -> PathBuf {
    hash_dir(cache_dir, source_path).join("typography.toml")
}

fn bookmarks_path(cache_dir: &Path, source_path: &Path) -> PathBuf {
    hash_dir(cache_dir, source_path).join("bookmarks.toml")
}

pub fn load_progress(cache_dir: &Path, source_path: &Path) -> Option<ReadingProgress> {
    load_entry(&progress_path(cache_dir, source_path))
}

pub fn save_progress(cache_dir: &Path, source_path: &Path, progress: &ReadingProgress) {
    save_entry(&progress_path(cache_dir, source_path), progress);
}

pub fn load_typography(cache_dir: &Path, source_path: &Path) -> Option<TypographyOverride> {
    load_entry(&typography_path(cache_dir, source_path))
}

pub fn save_typography(cache_dir: &Path, source_path: &Path, typography: &TypographyOverride) {
    save_entry(&typography_path(cache_dir, source_path), typography);
}

pub fn load_bookmarks(cache_dir: &Path, source_path: &Path) -> Vec<PageBookmark> {
    load_entry::<BookmarkFile>(&bookmarks_path(cache_dir, source_path))
        .map(|file| file.bookmarks)
        .unwrap_or_default()
}

pub fn save_bookmarks(cache_dir: &Path, source_path: &Path, bookmarks: &[PageBookmark]) {
    let file = BookmarkFile {
        bookmarks: bookmarks.to_vec(),
    };
    save_entry(&bookmarks_path(cache_dir, source_path), &file);
}

fn load_entry<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let data = fs::read_to_string(path).ok()?;
    match toml::from_str(&data) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(path = %path.display(), "Ignoring unreadable cache entry: {err}");
            None
        }
    }
}

fn save_entry<T: Serialize>(path: &Path, value: &T) {
    if let Some(parent) = path.parent() {
        if let Err(err) = fs::create_dir_all(parent) {
            warn!(path = %parent.display(), "Failed to create cache dir: {err}");
            return;
        }
    }
    let contents = match toml::to_string(value) {
        Ok(contents) => contents,
        Err(err) => {
            warn!(path = %path.display(), "Failed to serialize cache entry: {err}");
            return;
        }
    };
    match fs::write(path, contents) {
        Ok(()) => debug!(path = %path.display(), "Saved cache entry"),
        Err(err) => warn!(path = %path.display(), "Failed to write cache entry: {err}"),
    }
}
