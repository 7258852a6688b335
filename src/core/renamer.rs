//! In-place renaming of episode files to their canonical names.

use crate::core::parser::parse_episode;
use crate::core::planner;
use crate::utils::fs as fs_utils;
use crate::Result;
use colored::Colorize;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A file whose name differs from its canonical name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rename {
    pub from: PathBuf,
    pub to: PathBuf,
}

/// Outcome of a rename pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RenameReport {
    pub renamed: usize,
    pub declined: usize,
    pub conflicts: usize,
}

/// Episode files under `dir` that are not canonically named.
pub fn find_renames(dir: &Path) -> Result<Vec<Rename>> {
    fs_utils::ensure_directory(dir)?;

    let mut renames = Vec::new();
    for entry in WalkDir::new(dir)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let name = entry.file_name().to_string_lossy().to_string();
        let episode = match parse_episode(&name) {
            Some(episode) => episode,
            None => continue,
        };

        let canonical =
            planner::with_source_extension(&planner::canonical_filename(&episode), entry.path());
        if canonical != name {
            renames.push(Rename {
                from: entry.path().to_path_buf(),
                to: entry.path().with_file_name(canonical),
            });
        }
    }

    Ok(renames)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Ask whether to perform `rename`. Anything but `y`/`yes` declines.
fn confirm<R: BufRead, W: Write>(rename: &Rename, input: &mut R, output: &mut W) -> Result<bool> {
    write!(
        output,
        "Rename \"{}\" -> \"{}\"? [y/N] ",
        file_name(&rename.from),
        file_name(&rename.to).green()
    )?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    let answer = answer.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}

/// Apply `renames`, prompting for each unless `assume_yes`.
///
/// An existing file at the target is never replaced; it is counted as a
/// conflict and the pass continues.
pub fn apply<R: BufRead, W: Write>(
    renames: &[Rename],
    assume_yes: bool,
    input: &mut R,
    output: &mut W,
) -> Result<RenameReport> {
    let mut report = RenameReport::default();

    for rename in renames {
        if !assume_yes && !confirm(rename, input, output)? {
            report.declined += 1;
            continue;
        }

        match fs_utils::move_file_exclusive(&rename.from, &rename.to) {
            Ok(()) => {
                tracing::info!("Renamed {:?} -> {:?}", rename.from, rename.to);
                report.renamed += 1;
            }
            Err(crate::Error::DestinationExists(target)) => {
                tracing::warn!("Not renaming {:?}: {} already exists", rename.from, target);
                report.conflicts += 1;
            }
            Err(e) => return Err(e),
        }
    }

    Ok(report)
}
