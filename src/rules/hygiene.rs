//! Repository housekeeping checks: committed env files and ignore files.

use crate::scanner::FileRecord;
use serde::Serialize;

/// Basenames that indicate security-conscious housekeeping, reported for
/// context. Matched against the lowercased basename.
pub const SECURITY_FILE_NAMES: [&str; 5] = [
    ".dockerignore",
    ".gitignore",
    "security.md",
    "security.txt",
    ".security.yml",
];

/// Hygiene signals gathered from file names alone.
#[derive(Debug, Clone, Serialize)]
pub struct HygieneReport {
    /// Files whose lowercased basename ends in `.env`, in walk order.
    pub env_files: Vec<String>,
    /// Recognized housekeeping files, in walk order.
    pub security_files: Vec<String>,
    pub has_gitignore: bool,
    pub has_dockerignore: bool,
}

/// Sweeps basenames for hygiene signals. Content is never inspected.
pub fn scan_hygiene(files: &[FileRecord]) -> HygieneReport {
    let mut env_files = Vec::new();
    let mut security_files = Vec::new();
    let mut has_gitignore = false;
    let mut has_dockerignore = false;

    for record in files {
        let lowered = record
            .path
            .file_name()
            .map(|name| name.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if lowered.ends_with(".env") {
            env_files.push(record.display_path());
        }
        if SECURITY_FILE_NAMES.contains(&lowered.as_str()) {
            security_files.push(record.display_path());
        }
        // Ignore-file presence is an exact-name check, unlike the
        // case-insensitive sweeps above.
        if let Some(exact) = record.path.file_name() {
            if exact == ".gitignore" {
                has_gitignore = true;
            }
            if exact == ".dockerignore" {
                has_dockerignore = true;
            }
        }
    }

    HygieneReport {
        env_files,
        security_files,
        has_gitignore,
        has_dockerignore,
    }
}
