//! Output module: artifacts and run reports
//!
//! This module handles:
//! - Rendering extracted documents
//! - Writing them as uniquely named `.txt` artifacts
//! - Preparing the output directory before a run
//! - Summarizing what a run produced

mod artifact;
mod document;
pub mod stats;

pub use artifact::{artifact_file_name, path_component, sanitize_target_name, ArtifactWriter};
pub use document::ExtractedDocument;
pub use stats::{print_summary, RunSummary, TargetSummary};

use std::io;
use std::path::Path;

/// Creates the output directory, optionally removing leftover artifacts
///
/// Only regular `.txt` files directly inside `dir` are removed; anything else
/// is left alone. Returns the number of files removed.
pub fn prepare_output_dir(dir: &Path, clear: bool) -> io::Result<usize> {
    std::fs::create_dir_all(dir)?;
    if !clear {
        return Ok(0);
    }

    let mut removed = 0;
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if is_artifact(&path) {
            std::fs::remove_file(&path)?;
            removed += 1;
        }
    }

    if removed > 0 {
        tracing::info!(
            "Cleared {} existing file(s) from {}",
            removed,
            dir.display()
        );
    }
    Ok(removed)
}

/// Counts artifacts currently in `dir`
pub fn count_artifacts(dir: &Path) -> io::Result<usize> {
    let mut count = 0;
    for entry in std::fs::read_dir(dir)? {
        if is_artifact(&entry?.path()) {
            count += 1;
        }
    }
    Ok(count)
}

fn is_artifact(path: &Path) -> bool {
    path.is_file() && path.extension().is_some_and(|ext| ext == "txt")
}
