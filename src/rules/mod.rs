// Rules module
// This module exports the per-category detectors. Each detector makes an
// independent read-only pass over the file snapshot.

/// Dockerfile posture analysis.
pub mod docker;

/// Rules for detecting hardcoded secrets and credentials.
pub mod secrets;

/// Rules for detecting overly permissive database statements.
pub mod database;

/// CI configuration and scanner-tool evidence.
pub mod ci;

/// Repository housekeeping checks.
pub mod hygiene;
