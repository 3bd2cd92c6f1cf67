//! Detection of overly permissive SQL statements.

use crate::scanner::FileRecord;
use lazy_static::lazy_static;
use rayon::prelude::*;
use regex::Regex;
use serde::Serialize;

lazy_static! {
    /// GRANT ALL PRIVILEGES ON *.* -- a blanket grant over every database.
    static ref GRANT_ALL_RE: Regex =
        Regex::new(r"(?i)GRANT\s+ALL\s+PRIVILEGES\s+ON\s+\*\.\*").unwrap();
    /// 'user'@'...%' -- a quoted account whose host segment ends in a
    /// wildcard.
    static ref WILDCARD_HOST_RE: Regex = Regex::new(r"'[^']*'@'[^']*%'").unwrap();
}

/// An overly permissive SQL statement spotted in a file.
#[derive(Debug, Clone, Serialize)]
pub struct DatabaseFinding {
    /// Root-relative path of the file containing the statement.
    pub file: String,
    /// Which permissive construct was seen.
    pub description: String,
}

/// Sweeps all files for blanket grants and wildcard hosts.
///
/// One finding per pattern per file, blanket grants listed first for any
/// file that has both.
pub fn scan_database(files: &[FileRecord]) -> Vec<DatabaseFinding> {
    let per_file: Vec<Vec<DatabaseFinding>> = files
        .par_iter()
        .map(|record| {
            if record.content.is_empty() {
                return Vec::new();
            }
            let mut findings = Vec::new();
            if GRANT_ALL_RE.is_match(&record.content) {
                findings.push(DatabaseFinding {
                    file: record.display_path(),
                    description: "GRANT ALL PRIVILEGES *.* usage".to_string(),
                });
            }
            if WILDCARD_HOST_RE.is_match(&record.content) {
                findings.push(DatabaseFinding {
                    file: record.display_path(),
                    description: "Wildcard host in DB user '@%'".to_string(),
                });
            }
            findings
        })
        .collect();
    per_file.into_iter().flatten().collect()
}
