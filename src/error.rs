//! Error types for tvsort.
//!
//! A release name that is not an episode is not an error: the parser returns
//! `None` for it. Errors raised while submitting a feed item only fail that
//! item; everywhere else an error ends the run.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for tvsort.
#[derive(Error, Debug)]
pub enum Error {
    // File system errors
    #[error("Path not found: {0}")]
    PathNotFound(String),

    #[error("Not a directory: {0}")]
    NotADirectory(String),

    #[error("Source is not a file: {0}")]
    NotAFile(String),

    #[error("Destination already exists: {0}")]
    DestinationExists(String),

    #[error("Download contains no files: {0}")]
    EmptyDownload(String),

    #[error("Checksum mismatch after copying: {0}")]
    ChecksumMismatch(String),

    #[error("Moved file but failed to remove {path}: {source}")]
    Cleanup {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // Episode identity errors
    #[error("No path component is a recognizable episode: {0}")]
    Unrecognized(String),

    // Collaborator errors
    #[error("Malformed feed: {0}")]
    Feed(String),

    #[error("Download client rejected {name}: {reason}")]
    Submission { name: String, reason: String },

    #[error("Download client RPC failed: {0}")]
    Rpc(String),

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // HTTP errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // JSON errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // TOML errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}
