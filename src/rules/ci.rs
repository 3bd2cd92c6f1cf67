//! CI configuration and scanner-tool evidence.

use crate::scanner::FileRecord;
use rayon::prelude::*;
use serde::Serialize;
use std::path::Path;

/// Security scanner tools whose mention in any file counts as evidence of
/// automated scanning. Matched as lowercase substrings.
pub const SCANNER_TOOLS: [&str; 9] = [
    "trivy",
    "snyk",
    "dependabot",
    "bandit",
    "safety",
    "semgrep",
    "codeql",
    "sonarqube",
    "anchore",
];

/// What the CI sweep observed across the tree.
#[derive(Debug, Clone, Serialize)]
pub struct CiEvidence {
    /// Files living under a recognized CI configuration location, in walk
    /// order.
    pub ci_paths: Vec<String>,
    /// Files mentioning a known scanner tool, sorted and deduplicated.
    pub scanner_mentions: Vec<String>,
}

/// True when the relative path sits in a recognized CI location: any file
/// under a `.github` directory, or a file named `.gitlab-ci.yml`.
fn is_ci_path(path: &Path) -> bool {
    let mut parts = path.iter();
    let file_name = parts.next_back();
    parts.any(|part| part == ".github") || file_name.map_or(false, |name| name == ".gitlab-ci.yml")
}

/// Collects CI paths and scanner mentions in one pass over the snapshot.
pub fn scan_ci(files: &[FileRecord]) -> CiEvidence {
    let ci_paths: Vec<String> = files
        .iter()
        .filter(|record| is_ci_path(&record.path))
        .map(|record| record.display_path())
        .collect();

    let mentions: Vec<Option<String>> = files
        .par_iter()
        .map(|record| {
            if record.content.is_empty() {
                return None;
            }
            let lowered = record.content.to_lowercase();
            if SCANNER_TOOLS.iter().any(|tool| lowered.contains(tool)) {
                Some(record.display_path())
            } else {
                None
            }
        })
        .collect();

    let mut scanner_mentions: Vec<String> = mentions.into_iter().flatten().collect();
    scanner_mentions.sort();
    scanner_mentions.dedup();

    CiEvidence {
        ci_paths,
        scanner_mentions,
    }
}
