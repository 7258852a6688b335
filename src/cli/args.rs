//! Command line argument definitions.

use crate::models::config::PilotRule;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// tvsort - Fetch new TV episodes and file finished downloads
#[derive(Parser, Debug)]
#[command(name = "tvsort")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Append log output to this file instead of stderr
    #[arg(long, global = true, value_name = "FILE")]
    pub log: Option<PathBuf>,

    /// Configuration file (default: <config dir>/tvsort/config.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Library options shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct LibraryArgs {
    /// Directory containing the TV shows (repeat for more; the first is primary)
    #[arg(long = "tv-shows", value_name = "DIR")]
    pub tv_shows: Vec<PathBuf>,

    /// Title similarity that must be exceeded to match a show folder (0-1)
    #[arg(long, value_name = "SCORE")]
    pub threshold: Option<f64>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Queue new episodes from a feed
    Prequeue {
        /// Feed URL (default: from configuration)
        #[arg(value_name = "FEED")]
        feed: Option<String>,

        #[command(flatten)]
        library: LibraryArgs,

        /// Download every episode, even of shows not in the library
        #[arg(long)]
        get_all: bool,

        /// Do not download pilots automatically
        #[arg(long)]
        no_pilots: bool,

        /// Decide what to download but do not submit anything
        #[arg(long)]
        no_upload: bool,

        /// Which episodes count as pilots
        #[arg(long, value_enum, value_name = "RULE")]
        pilot_rule: Option<PilotRule>,
    },

    /// Move a finished download into the library
    Postqueue {
        /// Downloaded file or directory (default: from download client environment)
        #[arg(value_name = "PATH")]
        path: Option<PathBuf>,

        #[command(flatten)]
        library: LibraryArgs,
    },

    /// Rename episode files in a directory to their canonical names
    Rename {
        /// Directory to process
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Rename without asking
        #[arg(short, long)]
        yes: bool,
    },
}
