//! Destination planner.
//!
//! Computes where an episode belongs in the library:
//!
//! ```text
//! <show directory>/Season <ss>/<title.dotted>.s<ss>e<ee>.<trailer>
//! ```
//!
//! The show directory is the matching folder found by the identity resolver,
//! or a new folder named after the parsed title under the primary library.

use crate::core::library::{self, ShowMatch};
use crate::models::episode::Episode;
use crate::utils::text;
use crate::Result;
use std::path::{Path, PathBuf};

/// Planned location for an episode.
#[derive(Debug, Clone, PartialEq)]
pub struct Destination {
    /// Show folder (existing or to be created).
    pub show_dir: PathBuf,
    /// Whether `show_dir` was matched in a library rather than derived.
    pub matched: bool,
    /// Full path of the destination file.
    pub path: PathBuf,
}

/// Canonical file name for an episode.
pub fn canonical_filename(episode: &Episode) -> String {
    format!(
        "{}.s{:02}e{:02}.{}",
        text::dotted(&episode.title),
        episode.season,
        episode.episode,
        episode.trailer.to_lowercase()
    )
}

/// Ensure `filename` ends with the extension of `source`.
///
/// A name derived from a release directory carries no extension of its own,
/// and an obfuscated payload name carries only its extension; either way the
/// real extension must survive, without being doubled.
pub fn with_source_extension(filename: &str, source: &Path) -> String {
    let ext = match source.extension().and_then(|e| e.to_str()) {
        Some(ext) if !ext.is_empty() => ext.to_lowercase(),
        _ => return filename.to_string(),
    };

    let suffix = format!(".{}", ext);
    if filename.to_lowercase().ends_with(&suffix) {
        filename.to_string()
    } else {
        format!("{}{}", filename, suffix)
    }
}

/// Season folder name.
pub fn season_dir(season: u32) -> String {
    format!("Season {:02}", season)
}

/// Show folder for an episode, with the library match if there is one.
pub fn show_directory(
    libraries: &[PathBuf],
    episode: &Episode,
    threshold: f64,
) -> Result<(PathBuf, Option<ShowMatch>)> {
    match library::resolve(libraries, &episode.title, threshold) {
        Some(found) => Ok((found.directory.clone(), Some(found))),
        None => {
            let primary = libraries.first().ok_or_else(|| {
                crate::Error::Config("at least one tv-shows library is required".to_string())
            })?;
            Ok((primary.join(&episode.title), None))
        }
    }
}

/// Plan the destination of an episode.
pub fn plan(libraries: &[PathBuf], episode: &Episode, threshold: f64) -> Result<Destination> {
    let (show_dir, found) = show_directory(libraries, episode, threshold)?;
    let path = show_dir
        .join(season_dir(episode.season))
        .join(canonical_filename(episode));

    Ok(Destination {
        show_dir,
        matched: found.is_some(),
        path,
    })
}

/// Plan the destination of a file on disk, keeping its real extension.
pub fn plan_for_file(
    libraries: &[PathBuf],
    episode: &Episode,
    threshold: f64,
    source: &Path,
) -> Result<Destination> {
    let mut destination = plan(libraries, episode, threshold)?;
    let filename = with_source_extension(&canonical_filename(episode), source);
    destination.path.set_file_name(filename);
    Ok(destination)
}
