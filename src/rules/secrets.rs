//! Credential-pattern sweep over the file snapshot.

use crate::scanner::FileRecord;
use lazy_static::lazy_static;
use rayon::prelude::*;
use regex::Regex;
use serde::Serialize;
use std::path::Path;

/// Suffixes that mark a file as binary; such files are never swept.
/// Matched against the lowercased basename.
pub const BINARY_EXTENSIONS: [&str; 11] = [
    ".png", ".jpg", ".jpeg", ".gif", ".pdf", ".zip", ".tar", ".gz", ".7z", ".rar", ".pyc",
];

/// Characters of context kept on each side of a match.
const SNIPPET_CONTEXT: usize = 20;

lazy_static! {
    /// Ordered credential patterns. Every regex carries one capture group
    /// around the credential-shaped span so snippet extraction is uniform.
    /// The `(?:^|[^A-Za-z0-9_])` prefixes on the generic SECRET/API
    /// patterns keep them from matching inside longer identifiers such as
    /// AWS_SECRET_ACCESS_KEY, which already has a pattern of its own.
    static ref SECRET_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(?i)(AWS_SECRET_ACCESS_KEY\s*[=:])").unwrap(),
        Regex::new(r"(?i)(AWS_ACCESS_KEY_ID\s*[=:])").unwrap(),
        Regex::new(r"(?i)(?:^|[^A-Za-z0-9_])(SECRET(?:_?KEY)?\s*[=:])").unwrap(),
        Regex::new(r"(?i)(?:^|[^A-Za-z0-9_])(API(?:_?KEY)?\s*[=:])").unwrap(),
        Regex::new(r"(?i)(PASSWORD\s*[=:])").unwrap(),
        Regex::new(r"(?i)(IDENTIFIED BY\s+'[^']*')").unwrap(),
        Regex::new(r"(?i)(-----BEGIN (?:RSA |EC |OPENSSH )?PRIVATE KEY-----)").unwrap(),
        Regex::new(r"(?i)(GITHUB_TOKEN\s*[=:])").unwrap(),
        Regex::new(r"(?i)(GITLAB_TOKEN\s*[=:])").unwrap(),
        Regex::new(r"(?i)(DOCKER_PASSWORD\s*[=:])").unwrap(),
        Regex::new(r"(?i)(JWT_SECRET\s*[=:])").unwrap(),
        Regex::new(r"(?i)(DATABASE_URL\s*[=:].*://.*:.*@)").unwrap(),
        Regex::new(r"(?i)(mongodb://.*:.*@)").unwrap(),
        Regex::new(r"(?i)(redis://.*:.*@)").unwrap(),
    ];
}

/// A single credential-shaped match with its surrounding context.
#[derive(Debug, Clone, Serialize)]
pub struct SecretFinding {
    /// Root-relative path of the file containing the match.
    pub file: String,
    /// Context window around the match, newlines flattened to spaces.
    pub snippet: String,
}

fn is_binary_name(path: &Path) -> bool {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    BINARY_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}

/// Fixed-width context window around a byte span, measured in characters
/// so multi-byte content cannot split a code point. Newlines become
/// spaces to keep the snippet on one line.
fn context_snippet(content: &str, start: usize, end: usize) -> String {
    let before: String = content[..start]
        .chars()
        .rev()
        .take(SNIPPET_CONTEXT)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    let after: String = content[end..].chars().take(SNIPPET_CONTEXT).collect();

    let mut snippet = String::with_capacity(before.len() + (end - start) + after.len());
    snippet.push_str(&before);
    snippet.push_str(&content[start..end]);
    snippet.push_str(&after);
    snippet.replace('\n', " ")
}

/// Sweeps every scannable file against the pattern table.
///
/// At most one finding is recorded per pattern per file (the first
/// occurrence), so repeated boilerplate cannot inflate the result;
/// scoring penalizes the number of affected files, not raw match counts.
pub fn scan_secrets(files: &[FileRecord]) -> Vec<SecretFinding> {
    let per_file: Vec<Vec<SecretFinding>> = files
        .par_iter()
        .map(|record| {
            if record.content.is_empty() || is_binary_name(&record.path) {
                return Vec::new();
            }
            let mut findings = Vec::new();
            for pattern in SECRET_PATTERNS.iter() {
                if let Some(matched) = pattern.captures(&record.content).and_then(|c| c.get(1)) {
                    findings.push(SecretFinding {
                        file: record.display_path(),
                        snippet: context_snippet(&record.content, matched.start(), matched.end()),
                    });
                }
            }
            findings
        })
        .collect();
    per_file.into_iter().flatten().collect()
}
