//! Score formulas, letter grading and recommendation assembly.
//!
//! Scores are computed in integer arithmetic wherever rounding could
//! otherwise depend on float representation; identical findings must
//! always produce identical output bytes.

use crate::rules::ci::CiEvidence;
use crate::rules::database::DatabaseFinding;
use crate::rules::docker::DockerfileReport;
use crate::rules::hygiene::HygieneReport;
use crate::rules::secrets::SecretFinding;
use crate::scanner::ScanDetails;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Category weights in hundredths. They sum to 100.
pub const DOCKER_WEIGHT: u32 = 35;
pub const SECRETS_WEIGHT: u32 = 25;
pub const DATABASE_WEIGHT: u32 = 20;
pub const CI_WEIGHT: u32 = 10;
pub const HYGIENE_WEIGHT: u32 = 10;

/// Letter grade buckets over the weighted overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Grade {
    #[serde(rename = "A+")]
    APlus,
    A,
    B,
    C,
    D,
    E,
}

impl Grade {
    pub fn as_str(self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::E => "E",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn clamp_score(value: i32) -> u8 {
    value.clamp(0, 10) as u8
}

/// Truncated integer mean of the per-file Dockerfile scores. A tree with
/// no Dockerfiles gets the neutral midpoint 5: absence proves nothing
/// either way.
pub fn docker_score(reports: &[DockerfileReport]) -> u8 {
    if reports.is_empty() {
        return 5;
    }
    let total: u32 = reports.iter().map(|report| u32::from(report.score)).sum();
    (total / reports.len() as u32) as u8
}

/// Two points off per distinct affected file, floored at 0. Breadth of
/// exposure is what matters; many findings in one file count once.
pub fn secrets_score(findings: &[SecretFinding]) -> u8 {
    let affected = findings
        .iter()
        .map(|finding| finding.file.as_str())
        .collect::<BTreeSet<_>>()
        .len() as i32;
    clamp_score(10 - 2 * affected)
}

/// Three points off per distinct affected file, floored at 0.
pub fn database_score(findings: &[DatabaseFinding]) -> u8 {
    let affected = findings
        .iter()
        .map(|finding| finding.file.as_str())
        .collect::<BTreeSet<_>>()
        .len() as i32;
    clamp_score(10 - 3 * affected)
}

/// CI evidence only ever raises the neutral base of 5: +3 for CI
/// configuration, +2 for scanner-tool mentions, capped at 10.
pub fn ci_score(evidence: &CiEvidence) -> u8 {
    let mut score: i32 = 5;
    if !evidence.ci_paths.is_empty() {
        score += 3;
    }
    if !evidence.scanner_mentions.is_empty() {
        score += 2;
    }
    score.min(10) as u8
}

/// Starts at 10; committed env files cost 2 each up to 6, a missing
/// .gitignore costs 2, and a missing .dockerignore costs 1 but only when
/// the tree actually has Dockerfiles.
pub fn hygiene_score(hygiene: &HygieneReport, has_dockerfiles: bool) -> u8 {
    let mut score: i32 = 10;
    if !hygiene.env_files.is_empty() {
        score -= (hygiene.env_files.len() as i32 * 2).min(6);
    }
    if !hygiene.has_gitignore {
        score -= 2;
    }
    if !hygiene.has_dockerignore && has_dockerfiles {
        score -= 1;
    }
    clamp_score(score)
}

/// Weighted overall score with exactly one decimal.
///
/// The sum runs in integer hundredths and rounds half-up to tenths before
/// the single float conversion at the end.
pub fn overall_score(docker: u8, secrets: u8, database: u8, ci: u8, hygiene: u8) -> f64 {
    let hundredths = u32::from(docker) * DOCKER_WEIGHT
        + u32::from(secrets) * SECRETS_WEIGHT
        + u32::from(database) * DATABASE_WEIGHT
        + u32::from(ci) * CI_WEIGHT
        + u32::from(hygiene) * HYGIENE_WEIGHT;
    let tenths = (hundredths + 5) / 10;
    f64::from(tenths) / 10.0
}

/// Grade thresholds are inclusive lower bounds on the overall score.
pub fn letter_grade(overall: f64) -> Grade {
    if overall >= 9.0 {
        Grade::APlus
    } else if overall >= 8.0 {
        Grade::A
    } else if overall >= 7.0 {
        Grade::B
    } else if overall >= 6.0 {
        Grade::C
    } else if overall >= 5.0 {
        Grade::D
    } else {
        Grade::E
    }
}

/// Assembles the ordered remediation list.
///
/// Dockerfile notes come first, each prefixed with its file, deduplicated
/// and sorted; then the fixed category lines in severity order; finally a
/// priority banner is prepended when the overall score is poor.
pub fn build_recommendations(details: &ScanDetails, overall: f64) -> Vec<String> {
    let mut recommendations: Vec<String> = Vec::new();

    let docker_notes: BTreeSet<String> = details
        .dockerfile_paths
        .iter()
        .zip(details.dockerfiles.iter())
        .flat_map(|(path, report)| {
            report
                .notes
                .iter()
                .map(move |note| format!("[{}] {}", path, note))
        })
        .collect();
    recommendations.extend(docker_notes);

    if !details.secret_findings.is_empty() {
        let affected: BTreeSet<&str> = details
            .secret_findings
            .iter()
            .map(|finding| finding.file.as_str())
            .collect();
        let joined = affected.into_iter().collect::<Vec<_>>().join(", ");
        recommendations.push(format!(
            "🚨 CRITICAL: Potential secrets/risky patterns detected in: {}",
            joined
        ));
        recommendations.push(
            "   → Review and remove hardcoded secrets, use environment variables or secret management"
                .to_string(),
        );
    }
    if !details.db_findings.is_empty() {
        recommendations.push(
            "⚠️  Database uses GRANT ALL or wildcard hosts; restrict privileges and hosts."
                .to_string(),
        );
    }
    if details.scanner_mentions.is_empty() {
        recommendations.push(
            "📊 Consider integrating security scanners (Trivy, Bandit, Dependabot, Semgrep)."
                .to_string(),
        );
    }
    if !details.hygiene_hits.is_empty() {
        recommendations.push(
            "📁 .env files found; ensure they are gitignored and not committed with secrets."
                .to_string(),
        );
    }
    if !details.has_gitignore {
        recommendations
            .push("📝 Missing .gitignore file; add one to prevent committing sensitive files.".to_string());
    }
    if !details.has_dockerignore && !details.dockerfile_paths.is_empty() {
        recommendations
            .push("🐳 Missing .dockerignore file; add one to reduce build context size.".to_string());
    }

    if overall < 5.0 {
        recommendations.insert(
            0,
            "🚨 URGENT: Project has critical security issues that need immediate attention!"
                .to_string(),
        );
    } else if overall < 7.0 {
        recommendations.insert(
            0,
            "⚠️  WARNING: Project has significant security concerns to address.".to_string(),
        );
    }

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_sum_to_one() {
        assert_eq!(
            DOCKER_WEIGHT + SECRETS_WEIGHT + DATABASE_WEIGHT + CI_WEIGHT + HYGIENE_WEIGHT,
            100
        );
    }

    #[test]
    fn test_grade_thresholds_are_inclusive() {
        assert_eq!(letter_grade(10.0), Grade::APlus);
        assert_eq!(letter_grade(9.0), Grade::APlus);
        assert_eq!(letter_grade(8.9), Grade::A);
        assert_eq!(letter_grade(8.0), Grade::A);
        assert_eq!(letter_grade(7.0), Grade::B);
        assert_eq!(letter_grade(6.0), Grade::C);
        assert_eq!(letter_grade(5.0), Grade::D);
        assert_eq!(letter_grade(4.9), Grade::E);
        assert_eq!(letter_grade(0.0), Grade::E);
    }

    #[test]
    fn test_overall_has_one_decimal() {
        // 35*4 + 25*8 + 20*10 + 10*5 + 10*7 = 660 hundredths.
        assert_eq!(overall_score(4, 8, 10, 5, 7), 6.6);
        assert_eq!(overall_score(10, 10, 10, 10, 10), 10.0);
        assert_eq!(overall_score(0, 0, 0, 0, 0), 0.0);
        // 755 hundredths rounds half-up to 7.6.
        assert_eq!(overall_score(5, 10, 10, 5, 8), 7.6);
    }

    #[test]
    fn test_grade_serializes_with_plus_sign() {
        assert_eq!(serde_json::to_string(&Grade::APlus).unwrap(), "\"A+\"");
        assert_eq!(serde_json::to_string(&Grade::E).unwrap(), "\"E\"");
        assert_eq!(Grade::APlus.to_string(), "A+");
    }
}
