// Unit tests for category scores and recommendation assembly

use repograde::rules::ci::CiEvidence;
use repograde::rules::database::DatabaseFinding;
use repograde::rules::docker::DockerfileReport;
use repograde::rules::secrets::SecretFinding;
use repograde::scanner::ScanDetails;
use repograde::scoring::{
    build_recommendations, ci_score, database_score, docker_score, letter_grade, overall_score,
    secrets_score, Grade,
};

fn docker_report(score: u8, notes: &[&str]) -> DockerfileReport {
    DockerfileReport {
        from_count: 1,
        has_user: true,
        user_non_root: true,
        has_healthcheck: true,
        exposes: Vec::new(),
        has_apt_cleanup: true,
        uses_pip_no_cache: false,
        has_add_instead_copy: false,
        uses_latest_tag: false,
        has_secrets_mount: false,
        runs_as_root: false,
        has_shell_form: false,
        score,
        notes: notes.iter().map(|n| n.to_string()).collect(),
    }
}

fn secret(file: &str) -> SecretFinding {
    SecretFinding {
        file: file.to_string(),
        snippet: "PASSWORD=x".to_string(),
    }
}

fn db_finding(file: &str) -> DatabaseFinding {
    DatabaseFinding {
        file: file.to_string(),
        description: "GRANT ALL PRIVILEGES *.* usage".to_string(),
    }
}

fn details() -> ScanDetails {
    ScanDetails {
        dockerfiles: Vec::new(),
        dockerfile_paths: Vec::new(),
        compose_files: Vec::new(),
        secret_findings: Vec::new(),
        db_findings: Vec::new(),
        ci_files: Vec::new(),
        scanner_mentions: vec!["ci.yml".to_string()],
        hygiene_hits: Vec::new(),
        security_files: Vec::new(),
        has_gitignore: true,
        has_dockerignore: true,
        total_files_scanned: 0,
    }
}

// --- CATEGORY SCORE TESTS ---

#[test]
fn test_docker_score_is_truncated_mean() {
    assert_eq!(docker_score(&[]), 5);
    assert_eq!(docker_score(&[docker_report(10, &[]), docker_report(9, &[])]), 9);
    assert_eq!(
        docker_score(&[
            docker_report(3, &[]),
            docker_report(4, &[]),
            docker_report(5, &[])
        ]),
        4
    );
    assert_eq!(docker_score(&[docker_report(0, &[])]), 0);
}

#[test]
fn test_secrets_score_counts_distinct_files() {
    assert_eq!(secrets_score(&[]), 10);
    assert_eq!(secrets_score(&[secret("a.py")]), 8);
    assert_eq!(secrets_score(&[secret("a.py"), secret("a.py")]), 8);
    assert_eq!(
        secrets_score(&[secret("a.py"), secret("b.py"), secret("c.py")]),
        4
    );
    let many: Vec<_> = (0..6).map(|i| secret(&format!("{}.py", i))).collect();
    assert_eq!(secrets_score(&many), 0);
}

#[test]
fn test_database_score_counts_distinct_files() {
    assert_eq!(database_score(&[]), 10);
    assert_eq!(database_score(&[db_finding("a.sql")]), 7);
    assert_eq!(
        database_score(&[db_finding("a.sql"), db_finding("b.sql")]),
        4
    );
    let many: Vec<_> = (0..4).map(|i| db_finding(&format!("{}.sql", i))).collect();
    assert_eq!(database_score(&many), 0);
}

#[test]
fn test_ci_score_additive() {
    let neither = CiEvidence {
        ci_paths: Vec::new(),
        scanner_mentions: Vec::new(),
    };
    let ci_only = CiEvidence {
        ci_paths: vec![".github/workflows/ci.yml".to_string()],
        scanner_mentions: Vec::new(),
    };
    let mentions_only = CiEvidence {
        ci_paths: Vec::new(),
        scanner_mentions: vec!["Makefile".to_string()],
    };
    let both = CiEvidence {
        ci_paths: vec![".gitlab-ci.yml".to_string()],
        scanner_mentions: vec!["Makefile".to_string()],
    };
    assert_eq!(ci_score(&neither), 5);
    assert_eq!(ci_score(&ci_only), 8);
    assert_eq!(ci_score(&mentions_only), 7);
    assert_eq!(ci_score(&both), 10);
}

// --- RECOMMENDATION TESTS ---

#[test]
fn test_clean_details_yield_no_recommendations() {
    let recommendations = build_recommendations(&details(), 8.0);
    assert!(recommendations.is_empty());
}

#[test]
fn test_docker_notes_prefixed_and_sorted_by_path() {
    let mut d = details();
    d.dockerfile_paths = vec!["b/Dockerfile".to_string(), "a/Dockerfile".to_string()];
    d.dockerfiles = vec![
        docker_report(8, &["No HEALTHCHECK defined."]),
        docker_report(8, &["No HEALTHCHECK defined."]),
    ];
    let recommendations = build_recommendations(&d, 8.0);
    assert_eq!(
        recommendations,
        vec![
            "[a/Dockerfile] No HEALTHCHECK defined.",
            "[b/Dockerfile] No HEALTHCHECK defined.",
        ]
    );
}

#[test]
fn test_secret_files_joined_sorted_and_deduplicated() {
    let mut d = details();
    d.secret_findings = vec![secret("b.py"), secret("a.py"), secret("b.py")];
    let recommendations = build_recommendations(&d, 8.0);
    assert_eq!(recommendations.len(), 2);
    assert_eq!(
        recommendations[0],
        "🚨 CRITICAL: Potential secrets/risky patterns detected in: a.py, b.py"
    );
    assert_eq!(
        recommendations[1],
        "   → Review and remove hardcoded secrets, use environment variables or secret management"
    );
}

#[test]
fn test_category_lines_follow_fixed_order() {
    let mut d = details();
    d.dockerfile_paths = vec!["Dockerfile".to_string()];
    d.dockerfiles = vec![docker_report(8, &["No HEALTHCHECK defined."])];
    d.secret_findings = vec![secret(".env")];
    d.db_findings = vec![db_finding("init.sql")];
    d.scanner_mentions = Vec::new();
    d.hygiene_hits = vec![".env".to_string()];
    d.has_gitignore = false;
    d.has_dockerignore = false;
    let recommendations = build_recommendations(&d, 4.0);
    assert_eq!(
        recommendations,
        vec![
            "🚨 URGENT: Project has critical security issues that need immediate attention!",
            "[Dockerfile] No HEALTHCHECK defined.",
            "🚨 CRITICAL: Potential secrets/risky patterns detected in: .env",
            "   → Review and remove hardcoded secrets, use environment variables or secret management",
            "⚠️  Database uses GRANT ALL or wildcard hosts; restrict privileges and hosts.",
            "📊 Consider integrating security scanners (Trivy, Bandit, Dependabot, Semgrep).",
            "📁 .env files found; ensure they are gitignored and not committed with secrets.",
            "📝 Missing .gitignore file; add one to prevent committing sensitive files.",
            "🐳 Missing .dockerignore file; add one to reduce build context size.",
        ]
    );
}

#[test]
fn test_dockerignore_line_needs_dockerfiles() {
    let mut d = details();
    d.has_dockerignore = false;
    // No Dockerfiles in the tree, so the .dockerignore nudge is skipped.
    assert!(build_recommendations(&d, 8.0).is_empty());
}

#[test]
fn test_banner_thresholds() {
    let mut d = details();
    d.scanner_mentions = Vec::new();
    let urgent = build_recommendations(&d, 4.9);
    let warning = build_recommendations(&d, 6.9);
    let none = build_recommendations(&d, 7.0);
    assert!(urgent[0].starts_with("🚨 URGENT"));
    assert!(warning[0].starts_with("⚠️  WARNING"));
    assert!(none[0].starts_with("📊"));
    assert_eq!(urgent.len(), 2);
    assert_eq!(warning.len(), 2);
    assert_eq!(none.len(), 1);
}

// --- OVERALL AND GRADE TESTS ---

#[test]
fn test_mixed_scores_combine_to_one_decimal() {
    let overall = overall_score(4, 8, 10, 5, 7);
    assert_eq!(overall, 6.6);
    assert_eq!(letter_grade(overall), Grade::C);
}

#[test]
fn test_all_neutral_scores() {
    // docker 5, secrets 10, database 10, ci 5, hygiene 8 is the resting
    // state of an empty tree.
    let overall = overall_score(5, 10, 10, 5, 8);
    assert_eq!(overall, 7.6);
    assert_eq!(letter_grade(overall), Grade::B);
}
