//! Dockerfile posture analysis.
//!
//! Each Dockerfile is reduced to a set of boolean facts, a 0-10 score and
//! the notes explaining every deduction. The checks are line-based
//! heuristics over trimmed lines; no Dockerfile grammar is parsed.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::path::Path;

/// Basenames treated as Dockerfiles. Exact, case-sensitive match, so
/// `Dockerfile.dev` and `DOCKERFILE` are not picked up.
pub const DOCKERFILE_NAMES: [&str; 2] = ["Dockerfile", "dockerfile"];

/// Basenames treated as Compose files. These are reported but not
/// analyzed.
pub const COMPOSE_NAMES: [&str; 4] = [
    "docker-compose.yml",
    "docker-compose.yaml",
    "compose.yaml",
    "compose.yml",
];

lazy_static! {
    /// USER instruction with any argument.
    static ref USER_ANY_RE: Regex = Regex::new(r"(?i)^USER\s+\S").unwrap();
    /// USER instruction whose argument is literally root.
    static ref USER_ROOT_RE: Regex = Regex::new(r"(?i)^USER\s+root\b").unwrap();
    /// FROM image with an explicit :latest tag.
    static ref LATEST_TAG_RE: Regex = Regex::new(r"(?i)FROM\s+[^\s:]+:latest").unwrap();
    /// FROM image with no tag at all (the reference runs to end of line).
    static ref UNTAGGED_RE: Regex = Regex::new(r"(?i)FROM\s+[^\s:]+\s*$").unwrap();
    /// Shell-form RUN/CMD/ENTRYPOINT: the argument does not open a JSON
    /// array. Keywords are matched case-sensitively, as conventionally
    /// written.
    static ref SHELL_FORM_RE: Regex = Regex::new(r"^(RUN|CMD|ENTRYPOINT)\s+[^\[]").unwrap();
}

/// Structured report for a single Dockerfile.
#[derive(Debug, Clone, Serialize)]
pub struct DockerfileReport {
    /// Number of FROM lines; one or fewer means a single-stage build.
    pub from_count: usize,
    /// Whether any USER instruction is present.
    pub has_user: bool,
    /// Whether some USER instruction names a non-root user.
    pub user_non_root: bool,
    /// Whether a HEALTHCHECK is defined.
    pub has_healthcheck: bool,
    /// Every EXPOSE line, verbatim (trimmed).
    pub exposes: Vec<String>,
    /// Whether apt-get usage is paired with a cache cleanup.
    pub has_apt_cleanup: bool,
    /// Whether pip installs pass --no-cache-dir.
    pub uses_pip_no_cache: bool,
    /// Whether plain ADD is used where COPY would do.
    pub has_add_instead_copy: bool,
    /// Whether any base image is :latest or untagged.
    pub uses_latest_tag: bool,
    /// Whether BuildKit secret mounts are used.
    pub has_secrets_mount: bool,
    /// Whether some USER instruction names root.
    pub runs_as_root: bool,
    /// Whether any RUN/CMD/ENTRYPOINT uses shell form.
    pub has_shell_form: bool,
    /// 0-10, after all deductions.
    pub score: u8,
    /// One note per deduction, plus an advisory when secrets are handled
    /// without a secret mount.
    pub notes: Vec<String>,
}

/// True when the path's basename is a recognized Dockerfile name.
pub fn is_dockerfile(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map_or(false, |name| DOCKERFILE_NAMES.contains(&name))
}

/// True when the path's basename is a recognized Compose file name.
pub fn is_compose_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map_or(false, |name| COMPOSE_NAMES.contains(&name))
}

/// Case-insensitive ASCII prefix check that stays on char boundaries.
fn has_prefix_ci(line: &str, prefix: &str) -> bool {
    line.get(..prefix.len())
        .map_or(false, |head| head.eq_ignore_ascii_case(prefix))
}

/// Raw keyword sweep used only for the secret-mount advisory; kept apart
/// from the credential detector so the advisory can fire on lines the
/// assignment patterns skip.
fn mentions_secret_keyword(lines: &[&str]) -> bool {
    lines.iter().any(|line| {
        let upper = line.to_uppercase();
        upper.contains("SECRET") || upper.contains("PASSWORD")
    })
}

/// Analyzes one Dockerfile's text.
///
/// Deductions: -2 single-stage, -3 missing USER (or -2 USER root),
/// -2 missing HEALTHCHECK, -1 missing apt cleanup, -1 ADD, -1 latest or
/// untagged base image, -1 shell form. The score floors at 0 and every
/// deduction contributes exactly one note.
pub fn analyze_dockerfile(text: &str) -> DockerfileReport {
    let lines: Vec<&str> = text.lines().map(str::trim).collect();

    let from_count = lines
        .iter()
        .filter(|line| has_prefix_ci(line, "FROM "))
        .count();
    let has_user = lines.iter().any(|line| has_prefix_ci(line, "USER "));
    let user_non_root = lines
        .iter()
        .any(|line| USER_ANY_RE.is_match(line) && !USER_ROOT_RE.is_match(line));
    let runs_as_root = lines.iter().any(|line| USER_ROOT_RE.is_match(line));
    let has_healthcheck = lines
        .iter()
        .any(|line| has_prefix_ci(line, "HEALTHCHECK "));
    let exposes: Vec<String> = lines
        .iter()
        .filter(|line| has_prefix_ci(line, "EXPOSE "))
        .map(|line| (*line).to_string())
        .collect();
    let has_apt_cleanup = lines.iter().any(|line| {
        line.contains("apt-get")
            && (line.contains("rm -rf /var/lib/apt/lists") || line.contains("apt-get clean"))
    });
    let uses_pip_no_cache = lines
        .iter()
        .any(|line| line.contains("pip install") && line.contains("--no-cache-dir"));
    let has_add_instead_copy = lines
        .iter()
        .any(|line| has_prefix_ci(line, "ADD ") && !has_prefix_ci(line, "ADD --"));
    let uses_latest_tag = lines
        .iter()
        .any(|line| LATEST_TAG_RE.is_match(line) || UNTAGGED_RE.is_match(line));
    let has_secrets_mount = lines
        .iter()
        .any(|line| line.contains("--mount=type=secret"));
    // Comment lines are skipped here and only here; commented-out
    // instructions are a common Dockerfile idiom.
    let has_shell_form = lines
        .iter()
        .any(|line| !line.starts_with('#') && SHELL_FORM_RE.is_match(line));

    let mut score: i32 = 10;
    let mut notes: Vec<String> = Vec::new();

    if from_count <= 1 {
        score -= 2;
        notes.push(
            "Single-stage build; consider multi-stage to reduce image size and attack surface."
                .to_string(),
        );
    }
    if !has_user {
        score -= 3;
        notes.push("No USER specified; container likely runs as root.".to_string());
    } else if !user_non_root || runs_as_root {
        score -= 2;
        notes.push("USER set to root; switch to a non-root user.".to_string());
    }
    if !has_healthcheck {
        score -= 2;
        notes.push("No HEALTHCHECK defined.".to_string());
    }
    if !has_apt_cleanup {
        score -= 1;
        notes.push("No apt cache cleanup detected.".to_string());
    }
    if has_add_instead_copy {
        score -= 1;
        notes.push("Using ADD instead of COPY; prefer COPY for local files.".to_string());
    }
    if uses_latest_tag {
        score -= 1;
        notes.push("Using 'latest' tag or no tag; pin to specific versions.".to_string());
    }
    if has_shell_form {
        score -= 1;
        notes.push(
            "Using shell form for RUN/CMD/ENTRYPOINT; prefer exec form for better signal handling."
                .to_string(),
        );
    }
    if !has_secrets_mount && mentions_secret_keyword(&lines) {
        notes.push("Consider using --mount=type=secret for handling secrets.".to_string());
    }

    DockerfileReport {
        from_count,
        has_user,
        user_non_root,
        has_healthcheck,
        exposes,
        has_apt_cleanup,
        uses_pip_no_cache,
        has_add_instead_copy,
        uses_latest_tag,
        has_secrets_mount,
        runs_as_root,
        has_shell_form,
        score: score.max(0) as u8,
        notes,
    }
}
