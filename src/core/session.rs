//! Per-invocation state.
//!
//! A [`Session`] lives for one command run and is passed by reference to the
//! engines. It owns the [`FoundSet`] of episodes already accounted for and
//! remembers which expensive lookups have been done.

use crate::core::library::{self, ShowMatch};
use crate::models::episode::Episode;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Episodes already queued or on disk during this run.
#[derive(Debug, Clone, Default)]
pub struct FoundSet {
    episodes: Vec<Episode>,
}

impl FoundSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an episode.
    pub fn insert(&mut self, episode: Episode) {
        self.episodes.push(episode);
    }

    /// Whether an episode with the same broadcast identity is present.
    pub fn contains(&self, episode: &Episode, threshold: f64) -> bool {
        self.episodes
            .iter()
            .any(|e| e.is_same_broadcast_as(episode, threshold))
    }

    /// Number of recorded episodes.
    pub fn len(&self) -> usize {
        self.episodes.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }
}

impl Extend<Episode> for FoundSet {
    fn extend<I: IntoIterator<Item = Episode>>(&mut self, iter: I) {
        self.episodes.extend(iter);
    }
}

/// State shared by the engines for one run.
#[derive(Debug, Clone)]
pub struct Session {
    /// Library roots in priority order.
    pub libraries: Vec<PathBuf>,
    /// Title similarity threshold.
    pub threshold: f64,
    /// Episodes accounted for so far.
    pub found: FoundSet,
    hydrated: bool,
    scanned: HashSet<PathBuf>,
    unreadable: HashSet<PathBuf>,
}

impl Session {
    /// Start a run over `libraries`.
    pub fn new(libraries: Vec<PathBuf>, threshold: f64) -> Self {
        Self {
            libraries,
            threshold,
            found: FoundSet::new(),
            hydrated: false,
            scanned: HashSet::new(),
            unreadable: HashSet::new(),
        }
    }

    /// Find the show folder for `title` in this run's libraries.
    ///
    /// An unreadable root is warned about the first time only.
    pub fn resolve(&mut self, title: &str) -> Option<ShowMatch> {
        let unreadable = &mut self.unreadable;
        library::resolve_reporting(&self.libraries, title, self.threshold, |root, e| {
            if unreadable.insert(root.to_path_buf()) {
                tracing::warn!("Skipping library {}: {}", root.display(), e);
            } else {
                tracing::debug!("Skipping library {}: {}", root.display(), e);
            }
        })
    }

    /// Library roots that could not be read so far.
    pub fn unreadable_libraries(&self) -> impl Iterator<Item = &Path> {
        self.unreadable.iter().map(PathBuf::as_path)
    }

    /// Whether `episode` is already accounted for.
    pub fn is_found(&self, episode: &Episode) -> bool {
        self.found.contains(episode, self.threshold)
    }

    /// Record `episode` as accounted for.
    pub fn record(&mut self, episode: Episode) {
        self.found.insert(episode);
    }

    /// Whether the download client queue has been loaded.
    pub fn is_hydrated(&self) -> bool {
        self.hydrated
    }

    /// Mark the download client queue as loaded.
    pub fn mark_hydrated(&mut self) {
        self.hydrated = true;
    }

    /// Whether `show_dir` has already been scanned for episodes.
    pub fn is_scanned(&self, show_dir: &Path) -> bool {
        self.scanned.contains(show_dir)
    }

    /// Mark `show_dir` as scanned.
    pub fn mark_scanned(&mut self, show_dir: &Path) {
        self.scanned.insert(show_dir.to_path_buf());
    }
}
