// Lib file to expose modules for testing and external usage.
// This file serves as the root for the library crate.

/// Module containing the file enumeration logic.
/// This includes the fixed directory and extension exclusion rules.
pub mod walker;

/// Module containing the scan orchestration.
/// This includes the snapshot loading and the `ScanReport` data model.
pub mod scanner;

/// Module containing the score formulas.
/// This includes category scoring, the letter grade and recommendations.
pub mod scoring;

/// Module containing the implementation of the category detectors.
/// This includes docker, secrets, database, ci and hygiene checks.
pub mod rules;
