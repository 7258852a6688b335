//! Show library index and identity resolution.
//!
//! A library is one or more root directories holding one folder per show.
//! Roots are searched in order and the first root with a good enough match
//! wins; roots are never merged into a single candidate pool.

use crate::utils::text;
use crate::Result;
use std::path::{Path, PathBuf};

/// Show folder names found directly under one library root.
#[derive(Debug, Clone, Default)]
pub struct LibraryIndex {
    /// The library root.
    pub root: PathBuf,
    /// Immediate subdirectory names, sorted.
    pub shows: Vec<String>,
}

/// A show folder that represents a title.
#[derive(Debug, Clone, PartialEq)]
pub struct ShowMatch {
    /// Full path to the show folder.
    pub directory: PathBuf,
    /// Folder name, used as the canonical show name.
    pub name: String,
    /// Similarity between the title and `name`.
    pub score: f64,
}

impl LibraryIndex {
    /// Snapshot the show folders under `root`.
    ///
    /// Hidden entries and plain files are ignored.
    pub fn build(root: &Path) -> Result<Self> {
        let mut shows = Vec::new();

        for entry in std::fs::read_dir(root)? {
            let entry = entry?;
            // Follows symlinks, so shows linked in from other disks count.
            if !entry.path().is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with('.') {
                continue;
            }
            shows.push(name);
        }
        shows.sort();

        Ok(Self {
            root: root.to_path_buf(),
            shows,
        })
    }

    /// Best show whose similarity to `title` strictly exceeds `threshold`.
    ///
    /// On equal scores the alphabetically first folder wins.
    pub fn best_match(&self, title: &str, threshold: f64) -> Option<ShowMatch> {
        let mut best: Option<(&String, f64)> = None;

        for name in &self.shows {
            let score = text::similarity(title, name);
            if score <= threshold {
                continue;
            }
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((name, score)),
            }
        }

        best.map(|(name, score)| ShowMatch {
            directory: self.root.join(name),
            name: name.clone(),
            score,
        })
    }
}

/// Find the show folder representing `title` across `libraries`.
///
/// Each library is scanned afresh; a root that cannot be read is skipped with
/// a warning so one offline disk does not stop the others from matching.
pub fn resolve(libraries: &[PathBuf], title: &str, threshold: f64) -> Option<ShowMatch> {
    resolve_reporting(libraries, title, threshold, |root, e| {
        tracing::warn!("Skipping library {}: {}", root.display(), e);
    })
}

/// Like [`resolve`], handing each unreadable root to `unreadable` instead of
/// logging it.
pub fn resolve_reporting<F>(
    libraries: &[PathBuf],
    title: &str,
    threshold: f64,
    mut unreadable: F,
) -> Option<ShowMatch>
where
    F: FnMut(&Path, &crate::Error),
{
    for root in libraries {
        let index = match LibraryIndex::build(root) {
            Ok(index) => index,
            Err(e) => {
                unreadable(root, &e);
                continue;
            }
        };

        if let Some(found) = index.best_match(title, threshold) {
            tracing::debug!(
                "Matched \"{}\" to {} ({:.2})",
                title,
                found.directory.display(),
                found.score
            );
            return Some(found);
        }
    }

    tracing::debug!("No library folder matches \"{}\"", title);
    None
}
