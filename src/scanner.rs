//! Scan orchestration: snapshot loading, detector passes and report
//! assembly.

use crate::rules::ci;
use crate::rules::database::{self, DatabaseFinding};
use crate::rules::docker::{self, DockerfileReport};
use crate::rules::hygiene;
use crate::rules::secrets::{self, SecretFinding};
use crate::scoring::{self, Grade};
use crate::walker;
use anyhow::Result;
use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// One file in the scan snapshot: a root-relative path and best-effort
/// UTF-8 content.
#[derive(Debug, Clone)]
pub struct FileRecord {
    /// Path relative to the scan root.
    pub path: PathBuf,
    /// File content. Empty when the file was unreadable; lossily decoded
    /// when it was not valid UTF-8.
    pub content: String,
}

impl FileRecord {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// The relative path as rendered in findings and report fields.
    pub fn display_path(&self) -> String {
        self.path.display().to_string()
    }
}

/// Category scores plus the derived overall rating.
/// This struct is serialized to JSON if requested.
#[derive(Debug, Clone, Serialize)]
pub struct Scores {
    /// Dockerfile posture, 0-10.
    pub docker: u8,
    /// Credential exposure, 0-10.
    pub secrets: u8,
    /// Database permissiveness, 0-10.
    pub database: u8,
    /// CI and scanner evidence, 0-10.
    pub ci: u8,
    /// Repository housekeeping, 0-10.
    pub hygiene: u8,
    /// Weighted combination, one decimal.
    pub overall: f64,
    /// Letter bucket for the overall score.
    pub grade: Grade,
}

/// Everything the detectors observed. Listed in walk order unless a
/// field says otherwise.
#[derive(Debug, Clone, Serialize)]
pub struct ScanDetails {
    /// One report per analyzed Dockerfile, aligned with
    /// `dockerfile_paths`.
    pub dockerfiles: Vec<DockerfileReport>,
    /// Relative paths of the analyzed Dockerfiles.
    pub dockerfile_paths: Vec<String>,
    /// Relative paths of Compose files (reported, not analyzed).
    pub compose_files: Vec<String>,
    /// Credential-pattern findings.
    pub secret_findings: Vec<SecretFinding>,
    /// Permissive-SQL findings.
    pub db_findings: Vec<DatabaseFinding>,
    /// Files under recognized CI locations.
    pub ci_files: Vec<String>,
    /// Files mentioning scanner tools, sorted and deduplicated.
    pub scanner_mentions: Vec<String>,
    /// Committed env files.
    pub hygiene_hits: Vec<String>,
    /// Recognized housekeeping files.
    pub security_files: Vec<String>,
    pub has_gitignore: bool,
    pub has_dockerignore: bool,
    /// Size of the enumerated snapshot.
    pub total_files_scanned: usize,
}

/// The complete result of one scan, produced fresh on every invocation.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    /// The scan root as given (after canonicalization by the caller).
    pub path: String,
    pub scores: Scores,
    pub details: ScanDetails,
    pub recommendations: Vec<String>,
}

/// Runs the full audit over `root`.
///
/// This function:
/// 1. Enumerates candidate files in deterministic walk order.
/// 2. Loads contents in parallel into an immutable snapshot.
/// 3. Runs the five detectors, each an independent read-only pass.
/// 4. Derives category scores, the weighted overall and the grade.
/// 5. Assembles the ordered recommendation list.
///
/// Nothing is ever written to the scanned tree.
pub fn scan(root: &Path) -> Result<ScanReport> {
    let paths = walker::collect_files(root);
    let files = load_records(root, &paths);
    debug!(files = files.len(), root = %root.display(), "snapshot loaded");

    // Dockerfiles are analyzed individually; Compose files are only
    // collected.
    let docker_records: Vec<&FileRecord> = files
        .iter()
        .filter(|record| docker::is_dockerfile(&record.path))
        .collect();
    let dockerfiles: Vec<DockerfileReport> = docker_records
        .iter()
        .map(|record| docker::analyze_dockerfile(&record.content))
        .collect();
    let dockerfile_paths: Vec<String> = docker_records
        .iter()
        .map(|record| record.display_path())
        .collect();
    let compose_files: Vec<String> = files
        .iter()
        .filter(|record| docker::is_compose_file(&record.path))
        .map(|record| record.display_path())
        .collect();

    let secret_findings = secrets::scan_secrets(&files);
    let db_findings = database::scan_database(&files);
    let ci_evidence = ci::scan_ci(&files);
    let hygiene_report = hygiene::scan_hygiene(&files);

    let docker_score = scoring::docker_score(&dockerfiles);
    let secrets_score = scoring::secrets_score(&secret_findings);
    let database_score = scoring::database_score(&db_findings);
    let ci_score = scoring::ci_score(&ci_evidence);
    let hygiene_score = scoring::hygiene_score(&hygiene_report, !dockerfile_paths.is_empty());
    let overall = scoring::overall_score(
        docker_score,
        secrets_score,
        database_score,
        ci_score,
        hygiene_score,
    );
    let grade = scoring::letter_grade(overall);

    let details = ScanDetails {
        dockerfiles,
        dockerfile_paths,
        compose_files,
        secret_findings,
        db_findings,
        ci_files: ci_evidence.ci_paths,
        scanner_mentions: ci_evidence.scanner_mentions,
        hygiene_hits: hygiene_report.env_files,
        security_files: hygiene_report.security_files,
        has_gitignore: hygiene_report.has_gitignore,
        has_dockerignore: hygiene_report.has_dockerignore,
        total_files_scanned: files.len(),
    };
    let recommendations = scoring::build_recommendations(&details, overall);

    Ok(ScanReport {
        path: root.display().to_string(),
        scores: Scores {
            docker: docker_score,
            secrets: secrets_score,
            database: database_score,
            ci: ci_score,
            hygiene: hygiene_score,
            overall,
            grade,
        },
        details,
        recommendations,
    })
}

/// Loads file contents in parallel, preserving walk order.
///
/// Read failures degrade to empty content and invalid UTF-8 is replaced
/// rather than rejected; a partially readable tree still scans.
fn load_records(root: &Path, paths: &[PathBuf]) -> Vec<FileRecord> {
    paths
        .par_iter()
        .map(|path| {
            let content = match fs::read(path) {
                Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "unreadable file treated as empty");
                    String::new()
                }
            };
            let relative = path.strip_prefix(root).unwrap_or(path).to_path_buf();
            FileRecord {
                path: relative,
                content,
            }
        })
        .collect()
}
