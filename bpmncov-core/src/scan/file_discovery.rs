//! Test file discovery using the ignore crate.

use crate::config::Project;
use crate::error::CoverageError;
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use std::path::PathBuf;

/// Walk the scan root for files matching the configured glob, respecting
/// .gitignore and the configured ignore patterns.
///
/// Files are returned in walker order. A missing scan root yields no files.
pub fn walk_artifacts(project: &Project) -> crate::Result<Vec<PathBuf>> {
    let scan_root = project.scan_root();
    if !scan_root.is_dir() {
        tracing::warn!(
            path = %scan_root.display(),
            "test directory not found, no references will be scanned"
        );
        return Ok(Vec::new());
    }

    let glob_set = build_glob_set(&project.config.scan.glob)?;
    let ignore_set = build_ignore_set(&project.config.ignore.patterns)?;

    let mut builder = WalkBuilder::new(&scan_root);
    builder.hidden(false);
    builder.git_ignore(true);
    builder.git_global(true);
    builder.git_exclude(true);
    // Honour .gitignore even outside a git checkout
    builder.require_git(false);

    let mut files = Vec::new();

    for entry in builder.build() {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable directory entry");
                continue;
            }
        };

        let path = entry.path();

        if path.is_dir() {
            continue;
        }

        let relative = path.strip_prefix(&scan_root).unwrap_or(path);

        if ignore_set.is_match(relative) {
            continue;
        }

        if glob_set.is_match(relative) {
            files.push(path.to_path_buf());
        }
    }

    tracing::debug!(count = files.len(), root = %scan_root.display(), "discovered test files");
    Ok(files)
}

fn build_glob_set(glob: &str) -> crate::Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    builder.add(Glob::new(glob).map_err(|e| CoverageError::GlobPattern(e.to_string()))?);
    builder
        .build()
        .map_err(|e| CoverageError::GlobPattern(e.to_string()))
}

fn build_ignore_set(patterns: &[String]) -> crate::Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob_pattern = if pattern.contains('*') || pattern.contains('?') {
            pattern.clone()
        } else {
            format!("**/{}", pattern)
        };
        if let Ok(g) = Glob::new(&glob_pattern) {
            builder.add(g);
        }
        if let Ok(g) = Glob::new(&format!("**/{}/**", pattern)) {
            builder.add(g);
        }
    }
    builder
        .build()
        .map_err(|e| CoverageError::GlobPattern(e.to_string()))
}
