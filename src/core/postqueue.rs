//! Placement engine.
//!
//! Files a finished download into the library. A download is either a single
//! file or a directory; for a directory the largest file is taken as the
//! payload and the directory is removed once the payload has moved.

use crate::core::parser::parse_episode;
use crate::core::planner;
use crate::core::session::Session;
use crate::models::episode::Episode;
use crate::utils::fs;
use crate::Result;
use std::path::{Component, Path, PathBuf};

/// A completed placement.
#[derive(Debug, Clone)]
pub struct Placement {
    /// Episode the payload was identified as.
    pub episode: Episode,
    /// Payload file that was moved.
    pub source: PathBuf,
    /// Where it was moved to.
    pub destination: PathBuf,
    /// Download directory that was removed afterwards.
    pub removed: Option<PathBuf>,
}

/// Identify the episode a file belongs to.
///
/// Path components are tried from the file name outward, so an obfuscated
/// payload inside a properly named release directory is still recognized.
pub fn identify(path: &Path) -> Option<Episode> {
    path.components().rev().find_map(|component| match component {
        Component::Normal(name) => parse_episode(&name.to_string_lossy()),
        _ => None,
    })
}

/// Resolve a download to the file that should be placed.
pub fn locate_payload(download: &Path) -> Result<PathBuf> {
    if download.is_dir() {
        fs::largest_file(download)
    } else if download.is_file() {
        Ok(download.to_path_buf())
    } else if download.exists() {
        Err(crate::Error::NotAFile(download.display().to_string()))
    } else {
        Err(crate::Error::PathNotFound(download.display().to_string()))
    }
}

/// Place a finished download into the library.
///
/// Fails without touching the source when the payload cannot be identified or
/// its destination is already taken.
pub fn place(session: &mut Session, download: &Path) -> Result<Placement> {
    let source = locate_payload(download)?;
    tracing::info!("Processing file: \"{}\"", source.display());

    let episode =
        identify(&source).ok_or_else(|| crate::Error::Unrecognized(source.display().to_string()))?;

    let destination =
        planner::plan_for_file(&session.libraries, &episode, session.threshold, &source)?;
    if !destination.matched {
        tracing::info!("New show folder: \"{}\"", destination.show_dir.display());
    }

    tracing::info!(
        "Writing \"{}\" to \"{}\"",
        source.display(),
        destination.path.display()
    );
    fs::move_file_exclusive(&source, &destination.path)?;
    session.record(episode.clone());

    let removed = if download.is_dir() {
        tracing::info!("Removing source directory {}", download.display());
        fs::remove_download(download)?;
        Some(download.to_path_buf())
    } else {
        None
    };

    Ok(Placement {
        episode,
        source,
        destination: destination.path,
        removed,
    })
}
