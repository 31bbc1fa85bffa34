//! Reference scanning: discover test files and collect `[bpmn:<id>]` hits.

mod file_discovery;
mod markers;

pub use file_discovery::walk_artifacts;
pub use markers::MarkerScanner;

use crate::config::Project;
use crate::model::ReferenceHit;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

/// Scan the given files for markers.
///
/// Hits are ordered file-then-line, files in the order given. A file that
/// cannot be read is logged and skipped; it never aborts the scan.
pub fn scan_artifacts(project: &Project, files: &[PathBuf]) -> crate::Result<Vec<ReferenceHit>> {
    let scanner = MarkerScanner::new(&project.config.scan.label_keywords)?;

    let scan_one = |path: &PathBuf| -> Vec<ReferenceHit> {
        let bytes = match fs::read(path) {
            Ok(b) => b,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping unreadable test file");
                return Vec::new();
            }
        };
        let text = String::from_utf8_lossy(&bytes);
        scanner.scan_text(&relative_display(&project.root, path), &text)
    };

    // Indexed collect keeps the input order on the parallel path
    let per_file: Vec<Vec<ReferenceHit>> = if project.config.scan.parallel {
        files.par_iter().map(scan_one).collect()
    } else {
        files.iter().map(scan_one).collect()
    };

    let hits: Vec<ReferenceHit> = per_file.into_iter().flatten().collect();
    tracing::debug!(files = files.len(), hits = hits.len(), "scanned test files");
    Ok(hits)
}

/// Project-relative path with `/` separators
fn relative_display(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
