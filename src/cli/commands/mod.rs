//! CLI command implementations.

pub mod postqueue;
pub mod prequeue;
pub mod rename;

use crate::cli::args::LibraryArgs;
use crate::models::config::Config;

/// Overlay library flags onto `config`.
pub fn apply_library_args(config: &mut Config, args: &LibraryArgs) {
    if !args.tv_shows.is_empty() {
        config.library.tv_shows = args.tv_shows.clone();
    }
    if let Some(threshold) = args.threshold {
        config.library.threshold = threshold;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_flags_override_config() {
        let mut config = Config::default();
        let args = LibraryArgs {
            tv_shows: vec![PathBuf::from("/tv")],
            threshold: Some(0.9),
        };
        apply_library_args(&mut config, &args);
        assert_eq!(config.library.tv_shows, vec![PathBuf::from("/tv")]);
        assert_eq!(config.library.threshold, 0.9);
    }

    #[test]
    fn test_empty_flags_keep_config() {
        let mut config = Config::default();
        apply_library_args(&mut config, &LibraryArgs::default());
        assert_eq!(config.library.tv_shows, vec![PathBuf::from(".")]);
    }
}
