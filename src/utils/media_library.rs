//! Demo video discovery
//!
//! Lists the `.mp4` files directly inside a media directory and derives a
//! display title from each file name.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// A local video offered as a demo source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DemoVideo {
    pub title: String,
    pub path: PathBuf,
}

pub struct MediaLibrary {
    root: PathBuf,
}

impl MediaLibrary {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Videos sorted by file name. A missing directory yields an empty list.
    pub fn scan(&self) -> Vec<DemoVideo> {
        if !self.root.is_dir() {
            debug!(dir = %self.root.display(), "media directory not found");
            return Vec::new();
        }

        let mut videos: Vec<DemoVideo> = WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!(error = %e, "skipping unreadable media entry");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file() && is_mp4(entry.path()))
            .filter_map(|entry| {
                let stem = entry.path().file_stem()?.to_string_lossy().into_owned();
                Some(DemoVideo {
                    title: title_from_stem(&stem),
                    path: entry.into_path(),
                })
            })
            .collect();

        videos.sort_by(|a, b| a.path.cmp(&b.path));
        videos
    }
}

fn is_mp4(path: &Path) -> bool {
    path.extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("mp4"))
}

/// `city_walk-4k` becomes `City Walk-4K`
pub fn title_from_stem(stem: &str) -> String {
    let mut title = String::with_capacity(stem.len());
    let mut at_word_start = true;
    for ch in stem.replace('_', " ").chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                title.extend(ch.to_uppercase());
            } else {
                title.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            title.push(ch);
            at_word_start = true;
        }
    }
    title
}
