//! Existence oracle.
//!
//! Answers "do we already have this episode?" from the cheapest source first:
//!
//! 1. the session's found set
//! 2. the download client's queue and history, loaded once per run
//! 3. the episode files under the matching show folder, scanned once per folder

use crate::core::parser::parse_episode;
use crate::core::session::Session;
use crate::models::episode::Episode;
use crate::services::client::QueueSource;
use std::path::Path;
use walkdir::WalkDir;

/// Whether `episode` is queued, downloaded, or on disk.
///
/// Lookups populate `session` as a side effect, so repeated calls within a run
/// cost one queue round trip and one scan per show folder at most.
pub async fn exists<Q: QueueSource>(
    session: &mut Session,
    episode: &Episode,
    queue: Option<&Q>,
) -> bool {
    if session.is_found(episode) {
        return true;
    }

    if let Some(queue) = queue {
        if !session.is_hydrated() {
            hydrate(session, queue).await;
            if session.is_found(episode) {
                return true;
            }
        }
    }

    let show = match session.resolve(&episode.title) {
        Some(show) => show,
        None => return false,
    };

    if !session.is_scanned(&show.directory) {
        let on_disk = scan_show(&show.directory);
        tracing::debug!(
            "Found {} episodes under {}",
            on_disk.len(),
            show.directory.display()
        );
        session.found.extend(on_disk);
        session.mark_scanned(&show.directory);
    }

    session.is_found(episode)
}

/// Load queued and finished jobs into the found set.
///
/// A client that cannot be reached leaves dedup to the library scan; the
/// session is marked hydrated either way so the client is asked only once.
async fn hydrate<Q: QueueSource>(session: &mut Session, queue: &Q) {
    session.mark_hydrated();

    let mut entries = Vec::new();
    match queue.list_active().await {
        Ok(active) => entries.extend(active),
        Err(e) => tracing::warn!("Could not list download queue: {}", e),
    }
    match queue.list_history().await {
        Ok(history) => entries.extend(history),
        Err(e) => tracing::warn!("Could not list download history: {}", e),
    }

    let before = session.found.len();
    session
        .found
        .extend(entries.iter().filter_map(|entry| parse_episode(&entry.name)));
    tracing::debug!(
        "Loaded {} episodes from {} download client jobs",
        session.found.len() - before,
        entries.len()
    );
}

/// Parse every file under `show_dir` as an episode.
pub fn scan_show(show_dir: &Path) -> Vec<Episode> {
    WalkDir::new(show_dir)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| parse_episode(&e.file_name().to_string_lossy()))
        .collect()
}
