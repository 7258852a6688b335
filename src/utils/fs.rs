//! File system utilities.

use crate::Result;
use sha2::{Digest, Sha256};
use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Check if a path exists and is a directory.
pub fn ensure_directory(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(crate::Error::PathNotFound(path.display().to_string()));
    }
    if !path.is_dir() {
        return Err(crate::Error::NotADirectory(path.display().to_string()));
    }
    Ok(())
}

/// Largest regular file under `dir`, searched recursively.
///
/// Ties go to the first file in path order.
pub fn largest_file(dir: &Path) -> Result<PathBuf> {
    let mut best: Option<(u64, PathBuf)> = None;

    for entry in WalkDir::new(dir)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
        match best {
            Some((best_size, _)) if size <= best_size => {}
            _ => best = Some((size, entry.into_path())),
        }
    }

    best.map(|(_, path)| path)
        .ok_or_else(|| crate::Error::EmptyDownload(dir.display().to_string()))
}

/// SHA-256 of a file's contents, hex encoded.
pub fn sha256_file(path: &Path) -> Result<String> {
    let mut file = fs::File::open(path)?;
    let mut hasher = Sha256::new();
    std::io::copy(&mut file, &mut hasher)?;
    Ok(format!("{:x}", hasher.finalize()))
}

/// Move a file to `to`, refusing to replace anything already there.
///
/// The destination is claimed with an exclusive create before any data moves,
/// so two runs racing for the same path cannot both succeed. Parent
/// directories are created as needed. If the move fails the claim is released
/// and the source is left in place.
pub fn move_file_exclusive(from: &Path, to: &Path) -> Result<()> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)?;
    }

    match OpenOptions::new().write(true).create_new(true).open(to) {
        Ok(_) => {}
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            return Err(crate::Error::DestinationExists(to.display().to_string()));
        }
        Err(e) => return Err(e.into()),
    }

    move_into_claim(from, to).inspect_err(|_| {
        let _ = fs::remove_file(to);
    })
}

/// Replace the claimed file at `to` with `from`.
///
/// Same-filesystem moves are a rename. Cross-filesystem moves copy, verify the
/// checksum, then delete the source.
fn move_into_claim(from: &Path, to: &Path) -> Result<()> {
    match fs::rename(from, to) {
        Ok(()) => {
            tracing::debug!("Moved (rename): {:?} -> {:?}", from, to);
            return Ok(());
        }
        Err(e) if e.kind() == ErrorKind::CrossesDevices => {
            tracing::debug!("Cross-filesystem move detected, using copy+delete");
        }
        Err(e) => return Err(e.into()),
    }

    let checksum = sha256_file(from)?;
    fs::copy(from, to)?;
    if sha256_file(to)? != checksum {
        return Err(crate::Error::ChecksumMismatch(to.display().to_string()));
    }

    fs::remove_file(from)?;
    tracing::debug!("Moved (copy+delete): {:?} -> {:?}", from, to);
    Ok(())
}

/// Remove a finished download directory.
pub fn remove_download(dir: &Path) -> Result<()> {
    fs::remove_dir_all(dir).map_err(|source| crate::Error::Cleanup {
        path: dir.display().to_string(),
        source,
    })
}
