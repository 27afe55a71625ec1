//! PDF Sanitizer CLI tool
//!
//! A command-line tool for checking PDFs for JavaScript and removing it.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use glob::glob;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

use pdf_sanitizer::pdf::{check_file, sanitize_file, SanitizeOptions, ScrubOptions};
use pdf_sanitizer::pdf::scrub::DEFAULT_MAX_PASSES;
use pdf_sanitizer::pdf::value::DEFAULT_MAX_DEPTH;

/// PDF Sanitizer - Check for and remove JavaScript from PDF files
#[derive(Parser)]
#[command(name = "pdf-sanitizer")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    # Check a PDF for JavaScript
    pdf-sanitizer check document.pdf

    # Check several PDFs with debug logging
    pdf-sanitizer -v check \"downloads/*.pdf\"

    # Remove JavaScript and save a sanitized copy
    pdf-sanitizer remove input.pdf output_sanitized.pdf")]
struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Limits {
    /// Maximum number of removal passes
    #[arg(long, default_value_t = DEFAULT_MAX_PASSES)]
    max_passes: usize,

    /// Maximum depth for reference chains and nested objects
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,
}

impl Limits {
    fn scrub_options(&self) -> ScrubOptions {
        ScrubOptions {
            max_passes: self.max_passes,
            max_depth: self.max_depth,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Check PDF files for JavaScript
    Check {
        /// Input PDF files. Supports glob patterns like "*.pdf"
        #[arg(required = true)]
        inputs: Vec<String>,

        #[command(flatten)]
        limits: Limits,
    },

    /// Remove JavaScript from a PDF and save a sanitized copy
    Remove {
        /// Input PDF file
        input: PathBuf,

        /// Output PDF file path
        output: PathBuf,

        #[command(flatten)]
        limits: Limits,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Check { inputs, limits } => cmd_check(inputs, &limits.scrub_options()),
        Commands::Remove { input, output, limits } => {
            cmd_remove(input, output, limits.scrub_options())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

/// Install a stderr subscriber; RUST_LOG overrides the level from --verbose
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("pdf_sanitizer={}", level)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Expand glob patterns in input paths
fn expand_globs(patterns: Vec<String>) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for pattern in patterns {
        // Check if pattern contains glob characters
        if pattern.contains('*') || pattern.contains('?') || pattern.contains('[') {
            let mut matched = false;
            for entry in glob(&pattern).with_context(|| format!("Invalid glob pattern: {}", pattern))? {
                match entry {
                    Ok(path) => {
                        paths.push(path);
                        matched = true;
                    }
                    Err(e) => tracing::warn!(%pattern, error = %e, "glob error"),
                }
            }
            if !matched {
                anyhow::bail!("No files matched pattern: {}", pattern);
            }
        } else {
            paths.push(PathBuf::from(pattern));
        }
    }

    Ok(paths)
}

/// Check each input and list what was found
fn cmd_check(inputs: Vec<String>, options: &ScrubOptions) -> Result<()> {
    let inputs = expand_globs(inputs)?;
    let mut failed = 0;

    for input in &inputs {
        match check_file(input, options) {
            Ok(findings) if findings.is_empty() => {
                println!("Result: No JavaScript detected in '{}'.", input.display());
            }
            Ok(findings) => {
                println!(
                    "Result: JavaScript DETECTED in '{}' ({} finding{}).",
                    input.display(),
                    findings.len(),
                    if findings.len() == 1 { "" } else { "s" }
                );
                for finding in &findings {
                    println!("  - {}", finding);
                }
            }
            Err(e) => {
                eprintln!("Error: cannot check '{}': {}", input.display(), e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} file(s) could not be checked", failed, inputs.len());
    }
    Ok(())
}

/// Remove JavaScript and report what was done
fn cmd_remove(input: PathBuf, output: PathBuf, scrub: ScrubOptions) -> Result<()> {
    let options = SanitizeOptions {
        input_path: input.clone(),
        output_path: output.clone(),
        scrub,
    };

    let report = sanitize_file(&options)
        .with_context(|| format!("Failed to sanitize '{}'", input.display()))?;

    for finding in &report.scrub.removed {
        println!("Removed: {}", finding);
    }
    println!(
        "Result: Removed {} JavaScript action(s) from '{}' in {} pass(es); saved to '{}'.",
        report.scrub.removed.len(),
        input.display(),
        report.scrub.passes,
        output.display()
    );
    if !report.scrub.converged {
        println!(
            "Warning: stopped after the maximum of {} passes before a clean scan.",
            report.scrub.passes
        );
    }

    match &report.remaining {
        Some(remaining) if remaining.is_empty() => {
            println!("Verification: Sanitized file '{}' appears clean.", output.display());
        }
        Some(remaining) => {
            println!(
                "Verification Warning: JavaScript may still be present in '{}' ({} finding(s)). Manual review recommended.",
                output.display(),
                remaining.len()
            );
        }
        None => {
            println!(
                "Verification Warning: could not load '{}' back to verify it. Manual review recommended.",
                output.display()
            );
        }
    }

    Ok(())
}
