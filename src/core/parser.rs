//! Release name parser.
//!
//! Recognizes the scene naming convention for TV episodes:
//!
//! ```text
//! <title>[. ][s]<season>[xe]<episode>...<1080p|2160p><trailer>
//! ```
//!
//! Names without a 1080p or 2160p tag are not episodes for our purposes.

use crate::models::episode::Episode;
use crate::utils::text;
use regex::Regex;
use std::sync::OnceLock;

const EPISODE_PATTERN: &str = r"(?i)^(.+)[. ]s?(\d{1,2})[xe](\d{2}).*((?:1080|2160)p.*)$";

fn episode_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(EPISODE_PATTERN).ok()).as_ref()
}

/// Parse a release name into an [`Episode`].
///
/// Returns `None` when `text` does not follow the episode convention. That is
/// the common case for feed entries and stray files, not an error.
pub fn parse_episode(text: &str) -> Option<Episode> {
    let caps = episode_regex()?.captures(text)?;

    let title = normalize_title(caps.get(1)?.as_str());
    if title.is_empty() {
        return None;
    }
    let season = caps.get(2)?.as_str().parse().ok()?;
    let episode = caps.get(3)?.as_str().parse().ok()?;
    let trailer = caps.get(4)?.as_str().to_string();

    Some(Episode {
        title,
        season,
        episode,
        trailer,
    })
}

/// Turn a raw release title into its presentable form.
///
/// Dots and underscores become spaces, runs of spaces collapse, and each word
/// is capitalized: `greys.anatomy` becomes `Greys Anatomy`.
pub fn normalize_title(raw: &str) -> String {
    let spaced = raw.replace(['_', '.'], " ");
    text::title_case(&spaced)
}
