//! File-level check and removal
//!
//! These are the only functions that touch the filesystem: load once, scan or
//! scrub in memory, save once.

use std::path::{Path, PathBuf};
use lopdf::Document;
use tracing::{info, warn};
use crate::error::{Error, Result};
use super::locate::{locate_javascript, Finding};
use super::scrub::{ScrubOptions, ScrubReport, Scrubber};

/// Options for removing JavaScript from a PDF file
#[derive(Debug, Clone)]
pub struct SanitizeOptions {
    /// PDF to sanitize
    pub input_path: PathBuf,
    /// Where the sanitized PDF is written
    pub output_path: PathBuf,
    /// Pass and depth limits
    pub scrub: ScrubOptions,
}

/// Result of sanitizing a file
#[derive(Debug, Clone)]
pub struct SanitizeReport {
    pub scrub: ScrubReport,
    /// Findings in the saved output after reloading it; empty if clean, `None`
    /// if the output could not be loaded back
    pub remaining: Option<Vec<Finding>>,
}

/// Load a PDF, distinguishing a missing file from a malformed one
pub fn load_document(path: &Path) -> Result<Document> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }

    Document::load(path).map_err(|source| Error::Load {
        path: path.to_path_buf(),
        source,
    })
}

/// Scan a PDF file for JavaScript actions without modifying it
///
/// # Example
///
/// ```no_run
/// use pdf_sanitizer::pdf::{check_file, ScrubOptions};
/// use std::path::Path;
///
/// let findings = check_file(Path::new("form.pdf"), &ScrubOptions::default())
///     .expect("Failed to check");
/// for finding in &findings {
///     println!("{}", finding);
/// }
/// ```
pub fn check_file(path: &Path, options: &ScrubOptions) -> Result<Vec<Finding>> {
    info!(path = %path.display(), "checking for JavaScript");
    let doc = load_document(path)?;
    let findings = Scrubber::new(options.clone(), path.display().to_string()).check(&doc)?;

    if findings.is_empty() {
        info!(path = %path.display(), "no JavaScript found");
    } else {
        warn!(path = %path.display(), count = findings.len(), "JavaScript found");
    }
    Ok(findings)
}

/// Remove JavaScript actions from a PDF and save the result
///
/// The output is written even when nothing was found, and even when the pass
/// limit was reached; in that case the report says the scrub did not converge.
/// After saving, the output is loaded again and scanned to fill
/// [`SanitizeReport::remaining`]. A failure at that point is logged and does
/// not turn the successful save into an error.
///
/// # Example
///
/// ```no_run
/// use pdf_sanitizer::pdf::{sanitize_file, SanitizeOptions, ScrubOptions};
/// use std::path::PathBuf;
///
/// let options = SanitizeOptions {
///     input_path: PathBuf::from("form.pdf"),
///     output_path: PathBuf::from("form-clean.pdf"),
///     scrub: ScrubOptions::default(),
/// };
///
/// let report = sanitize_file(&options).expect("Failed to sanitize");
/// assert!(report.remaining.is_some_and(|found| found.is_empty()));
/// ```
pub fn sanitize_file(options: &SanitizeOptions) -> Result<SanitizeReport> {
    let input = &options.input_path;
    let output = &options.output_path;

    if same_file(input, output) {
        return Err(Error::SamePath(output.clone()));
    }

    info!(input = %input.display(), output = %output.display(), "removing JavaScript");
    let mut doc = load_document(input)?;
    let scrub = Scrubber::new(options.scrub.clone(), input.display().to_string()).scrub(&mut doc)?;

    doc.save(output).map_err(|source| Error::Save {
        path: output.clone(),
        source,
    })?;
    info!(output = %output.display(), removed = scrub.removed.len(), "saved sanitized PDF");

    let remaining = verify_output(output, options.scrub.max_depth);
    Ok(SanitizeReport { scrub, remaining })
}

/// Load the saved output again and scan it
fn verify_output(output: &Path, max_depth: usize) -> Option<Vec<Finding>> {
    let remaining = load_document(output).and_then(|saved| locate_javascript(&saved, max_depth));
    match remaining {
        Ok(remaining) => {
            if !remaining.is_empty() {
                warn!(output = %output.display(), count = remaining.len(), "JavaScript still present after sanitizing");
            }
            Some(remaining)
        }
        Err(e) => {
            warn!(output = %output.display(), error = %e, "could not verify sanitized PDF");
            None
        }
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::value::DEFAULT_MAX_DEPTH;

    #[test]
    fn test_check_nonexistent_file() {
        let result = check_file(Path::new("nonexistent.pdf"), &ScrubOptions::default());
        assert!(matches!(result.unwrap_err(), Error::FileNotFound(_)));
    }

    #[test]
    fn test_sanitize_nonexistent_file() {
        let options = SanitizeOptions {
            input_path: PathBuf::from("nonexistent.pdf"),
            output_path: PathBuf::from("out.pdf"),
            scrub: ScrubOptions::default(),
        };
        assert!(matches!(sanitize_file(&options).unwrap_err(), Error::FileNotFound(_)));
    }

    #[test]
    fn test_unreadable_output_is_unverified() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let output = temp_dir.path().join("truncated.pdf");
        std::fs::write(&output, b"%PDF-1.5\n").unwrap();

        assert!(verify_output(&output, DEFAULT_MAX_DEPTH).is_none());
        assert!(verify_output(&temp_dir.path().join("missing.pdf"), DEFAULT_MAX_DEPTH).is_none());
    }

    // Integration tests with generated PDFs are in the tests/ directory
}
