//! Episode data model.

use crate::utils::text;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A TV episode identified from a release name.
///
/// Two notions of equality exist and are deliberately not exposed through
/// `PartialEq`: [`Episode::structurally_equals`] compares every field,
/// [`Episode::is_same_broadcast_as`] is the fuzzy identity used for dedup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Episode {
    /// Cleaned series title ("Greys Anatomy").
    pub title: String,
    /// Season number.
    pub season: u32,
    /// Episode number within the season.
    pub episode: u32,
    /// Release suffix from the resolution tag onward ("1080p.WEB.H264-CAKES.mkv").
    pub trailer: String,
}

impl Episode {
    /// All four fields are identical.
    pub fn structurally_equals(&self, other: &Episode) -> bool {
        self.title == other.title
            && self.season == other.season
            && self.episode == other.episode
            && self.trailer == other.trailer
    }

    /// Same season and episode, and titles similar above `threshold`.
    pub fn is_same_broadcast_as(&self, other: &Episode, threshold: f64) -> bool {
        self.season == other.season
            && self.episode == other.episode
            && text::similarity(&self.title, &other.title) > threshold
    }

    /// Whether this is the first episode of a season.
    pub fn is_season_premiere(&self) -> bool {
        self.episode == 1
    }

    /// Whether this is the first episode of the first season.
    pub fn is_series_premiere(&self) -> bool {
        self.season == 1 && self.episode == 1
    }
}

impl fmt::Display for Episode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}x{:02}", self.title, self.season, self.episode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn episode(title: &str, season: u32, number: u32, trailer: &str) -> Episode {
        Episode {
            title: title.to_string(),
            season,
            episode: number,
            trailer: trailer.to_string(),
        }
    }

    #[test]
    fn test_same_broadcast_ignores_trailer_and_punctuation() {
        let a = episode("Star Trek: Picard", 3, 9, "1080p.WEB.H264-CAKES");
        let b = episode("Star Trek Picard", 3, 9, "2160p.AMZN.WEB-DL");
        assert!(a.is_same_broadcast_as(&b, 0.6));
        assert!(!a.structurally_equals(&b));
    }

    #[test]
    fn test_different_episode_is_not_same_broadcast() {
        let a = episode("Greys Anatomy", 19, 14, "1080p");
        let b = episode("Greys Anatomy", 19, 15, "1080p");
        assert!(!a.is_same_broadcast_as(&b, 0.6));
    }

    #[test]
    fn test_structural_equality_is_exact() {
        let a = episode("Yellowjackets", 2, 1, "1080p.mkv");
        let b = a.clone();
        assert!(a.structurally_equals(&b));
        assert!(a.is_same_broadcast_as(&b, 0.9));
    }

    #[test]
    fn test_premiere_checks() {
        assert!(episode("Show", 4, 1, "1080p").is_season_premiere());
        assert!(!episode("Show", 4, 1, "1080p").is_series_premiere());
        assert!(episode("Show", 1, 1, "1080p").is_series_premiere());
    }

    #[test]
    fn test_display() {
        assert_eq!(episode("Greys Anatomy", 19, 5, "").to_string(), "Greys Anatomy 19x05");
    }
}
