use anyhow::{ensure, Context, Result};
use clap::Parser;
use colored::*;
use repograde::scanner::{self, ScanReport};
use repograde::scoring::Grade;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Command line interface configuration using `clap`.
/// This struct defines the arguments and flags accepted by the program.
#[derive(Parser)]
#[command(
    author,
    version,
    about = "Scan a project tree and rate its security hygiene",
    long_about = None
)]
struct Cli {
    /// Path to the project to audit.
    /// This is the root directory where the scan will begin.
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Output raw JSON.
    /// If true, the full structured report is printed for machine parsing.
    /// This is useful for integrating with other tools or CI/CD pipelines.
    #[arg(long)]
    json: bool,
}

/// Main entry point of the application.
///
/// This function handles argument parsing, validation of the scan root,
/// execution of the scan, and output formatting.
fn main() -> Result<()> {
    // Diagnostics go to stderr and are controlled by RUST_LOG, so the
    // report on stdout stays clean for piping.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    // Parse command line arguments using the Cli struct definition.
    let cli = Cli::parse();

    // Resolve and validate the scan root up front. A missing or
    // non-directory path is a usage error, not an empty report.
    let root = cli
        .path
        .canonicalize()
        .with_context(|| format!("cannot resolve project path: {}", cli.path.display()))?;
    ensure!(
        root.is_dir(),
        "project path is not a directory: {}",
        root.display()
    );

    // Run the scan. The tree is only ever read, never modified.
    // We propagate any error with `?`.
    let report = scanner::scan(&root)?;

    // Check if JSON output was requested.
    if cli.json {
        // Serialize the report struct to a pretty-printed JSON string.
        // This uses `serde_json` to convert the Rust struct to JSON.
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        // If not JSON, print a human-readable report.
        print_report(&report);
    }

    // Return Ok(()) to indicate successful execution.
    Ok(())
}

/// Prints the human-readable report to stdout.
fn print_report(report: &ScanReport) {
    let scores = &report.scores;

    // Print the header with bold text for visibility.
    println!("\n{}", "Project Security Report".bold());
    println!("=======================\n");
    println!("Path: {}", report.path);
    println!("Files scanned: {}", report.details.total_files_scanned);

    // Print the per-category scores followed by the weighted overall.
    println!("\n{}", "Security Scores (0-10)".bold());
    println!(" * Docker:   {}/10", scores.docker);
    println!(" * Secrets:  {}/10", scores.secrets);
    println!(" * Database: {}/10", scores.database);
    println!(" * CI/Scan:  {}/10", scores.ci);
    println!(" * Hygiene:  {}/10", scores.hygiene);
    println!(
        "\nOverall: {:.1}/10 (Grade: {})",
        scores.overall,
        grade_colored(scores.grade)
    );

    // Print the recommendations, already ordered by severity.
    println!();
    if report.recommendations.is_empty() {
        println!("No recommendations. Good job!");
    } else {
        println!("{}", "Recommendations:".bold());
        for recommendation in &report.recommendations {
            println!(" - {}", recommendation);
        }
    }

    // List the Dockerfiles that fed the docker score, if any were found.
    if !report.details.dockerfile_paths.is_empty() {
        println!("\n{}", "Dockerfiles analyzed:".bold());
        for path in &report.details.dockerfile_paths {
            println!(" - {}", path);
        }
    }
}

/// Colors the grade by tier: green for the A tiers, yellow for the
/// middle, red for the rest.
fn grade_colored(grade: Grade) -> ColoredString {
    match grade {
        Grade::APlus | Grade::A => grade.as_str().green().bold(),
        Grade::B | Grade::C => grade.as_str().yellow().bold(),
        Grade::D | Grade::E => grade.as_str().red().bold(),
    }
}
