//! Postqueue command implementation.
//!
//! Called by the download client when a job finishes. Without an explicit
//! path the download is taken from the client's environment:
//! - Transmission: `TR_TORRENT_DIR` and `TR_TORRENT_NAME`
//! - SABnzbd: `SAB_COMPLETE_DIR`

use crate::core::postqueue;
use crate::core::session::Session;
use crate::models::config::Config;
use crate::utils::fs::ensure_directory;
use crate::Result;
use colored::Colorize;
use std::path::{Path, PathBuf};

/// Locate the finished download from download client environment variables.
pub fn download_from_env() -> Result<PathBuf> {
    if let (Ok(dir), Ok(name)) = (
        std::env::var("TR_TORRENT_DIR"),
        std::env::var("TR_TORRENT_NAME"),
    ) {
        return Ok(Path::new(&dir).join(name));
    }
    if let Ok(dir) = std::env::var("SAB_COMPLETE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    Err(crate::Error::Config(
        "no download path given and neither TR_TORRENT_DIR/TR_TORRENT_NAME nor SAB_COMPLETE_DIR is set"
            .to_string(),
    ))
}

/// Run the postqueue command.
pub async fn postqueue(config: &Config, path: Option<&Path>) -> Result<()> {
    let download = match path {
        Some(p) => p.to_path_buf(),
        None => download_from_env()?,
    };

    if let Some(primary) = config.library.tv_shows.first() {
        ensure_directory(primary)?;
    }

    let mut session = Session::new(config.library.tv_shows.clone(), config.library.threshold);
    let placement = postqueue::place(&mut session, &download)?;

    println!(
        "{} {} -> {}",
        "[OK]".bold().green(),
        placement.episode,
        placement.destination.display()
    );
    Ok(())
}
