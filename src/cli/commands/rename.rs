//! Rename command implementation.

use crate::core::renamer;
use crate::Result;
use colored::Colorize;
use std::path::Path;

/// Rename episode files under `dir` to their canonical names.
pub async fn rename(dir: &Path, assume_yes: bool) -> Result<()> {
    let renames = renamer::find_renames(dir)?;
    if renames.is_empty() {
        println!("{}", "[OK] All episode files are canonically named".green());
        return Ok(());
    }

    println!("{} {} files to rename", "[RENAME]".bold().cyan(), renames.len());

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let report = renamer::apply(&renames, assume_yes, &mut stdin.lock(), &mut stdout.lock())?;

    println!();
    println!("{}", "[Rename Summary]".bold().green());
    println!("  {} {}", "Renamed:".bold(), report.renamed);
    println!("  {} {}", "Declined:".bold(), report.declined);
    if report.conflicts > 0 {
        println!("  {} {}", "Target exists:".bold(), report.conflicts.to_string().yellow());
    }
    Ok(())
}
