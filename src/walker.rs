//! Deterministic file enumeration with fixed exclusion rules.

use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

/// Directory names that are never descended into, compared
/// case-insensitively against every directory below the scan root.
pub const EXCLUDED_DIRS: [&str; 8] = [
    ".git",
    "__pycache__",
    "node_modules",
    "venv",
    ".venv",
    "site-packages",
    "dist",
    "build",
];

/// Extensions excluded from enumeration entirely. Documentation files are
/// full of example credentials and would drown the sweep in false
/// positives.
pub const EXCLUDED_EXTENSIONS: [&str; 2] = ["md", "markdown"];

/// True when the entry is a directory whose name is on the exclusion
/// list. The scan root itself (depth 0) is exempt, so a project that
/// happens to be named `build` can still be scanned.
fn is_excluded_dir(entry: &DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy().to_ascii_lowercase();
    EXCLUDED_DIRS.contains(&name.as_str())
}

fn has_excluded_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .map_or(false, |ext| EXCLUDED_EXTENSIONS.contains(&ext.as_str()))
}

/// Collects every candidate file beneath `root`, in a stable order.
///
/// Sibling entries are visited sorted by file name, so two scans of the
/// same tree enumerate identical sequences. Excluded directories are
/// pruned before descent and nothing below them is ever opened.
/// Unreadable entries are skipped; a partially readable tree must still
/// produce a report.
pub fn collect_files(root: &Path) -> Vec<PathBuf> {
    let files: Vec<PathBuf> = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_excluded_dir(entry))
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| !has_excluded_extension(entry.path()))
        .map(|entry| entry.into_path())
        .collect();
    debug!(count = files.len(), "collected candidate files");
    files
}
