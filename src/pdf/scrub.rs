//! Multi-pass locate-and-remove driver

use lopdf::Document;
use tracing::{debug, debug_span, info, info_span, warn};
use crate::error::Result;
use super::locate::{locate_javascript, Finding};
use super::remove::{remove_finding, Removal};
use super::value::DEFAULT_MAX_DEPTH;

/// Default number of removal passes before giving up on convergence
pub const DEFAULT_MAX_PASSES: usize = 10;

/// Options for scanning and scrubbing a document
#[derive(Debug, Clone)]
pub struct ScrubOptions {
    /// Maximum number of removal passes (at least one pass always runs)
    pub max_passes: usize,
    /// Bound on reference chains and container nesting
    pub max_depth: usize,
}

impl Default for ScrubOptions {
    fn default() -> Self {
        ScrubOptions {
            max_passes: DEFAULT_MAX_PASSES,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Result of a scrub
#[derive(Debug, Clone, Default)]
pub struct ScrubReport {
    /// Number of removal passes that ran
    pub passes: usize,
    /// Findings that were actually deleted, in the order they were applied
    pub removed: Vec<Finding>,
    /// False if the pass limit was hit before a pass found nothing
    pub converged: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PassState {
    Scanning,
    Mutating,
    ContinuePass,
    Converged,
    PassLimitReached,
}

/// Locates JavaScript actions and removes them pass by pass until a scan
/// comes back empty or the pass limit is reached
///
/// Every pass rescans the whole document: removing one action can change what
/// a later scan sees (shifted array indices, rebuilt annotation arrays), so
/// findings are never carried over between passes.
#[derive(Debug, Clone)]
pub struct Scrubber {
    options: ScrubOptions,
    label: String,
}

impl Scrubber {
    /// `label` identifies the document in log output
    pub fn new(options: ScrubOptions, label: impl Into<String>) -> Self {
        Scrubber {
            options,
            label: label.into(),
        }
    }

    pub fn options(&self) -> &ScrubOptions {
        &self.options
    }

    /// Single scan without mutation
    pub fn check(&self, doc: &Document) -> Result<Vec<Finding>> {
        let span = info_span!("check", document = %self.label);
        let _guard = span.enter();

        let findings = locate_javascript(doc, self.options.max_depth)?;
        for finding in &findings {
            debug!(%finding, "JavaScript action");
        }
        Ok(findings)
    }

    /// Remove JavaScript actions in place
    pub fn scrub(&self, doc: &mut Document) -> Result<ScrubReport> {
        let span = info_span!("scrub", document = %self.label);
        let _guard = span.enter();

        let max_passes = self.options.max_passes.max(1);
        let mut report = ScrubReport::default();
        let mut pending = Vec::new();
        let mut state = PassState::Scanning;

        loop {
            state = match state {
                PassState::Scanning => {
                    pending = locate_javascript(doc, self.options.max_depth)?;
                    if pending.is_empty() {
                        PassState::Converged
                    } else {
                        PassState::Mutating
                    }
                }
                PassState::Mutating => {
                    report.passes += 1;
                    let pass = report.passes;
                    let pass_span = debug_span!("pass", pass);
                    let _pass_guard = pass_span.enter();

                    let found = pending.len();
                    let before = report.removed.len();
                    for finding in pending.drain(..) {
                        if remove_finding(doc, &finding, self.options.max_depth) == Removal::Removed {
                            report.removed.push(finding);
                        }
                    }
                    info!(pass, found, removed = report.removed.len() - before, "removal pass finished");

                    if pass >= max_passes {
                        PassState::PassLimitReached
                    } else {
                        PassState::ContinuePass
                    }
                }
                PassState::ContinuePass => PassState::Scanning,
                PassState::Converged => {
                    report.converged = true;
                    debug!(passes = report.passes, "no JavaScript actions left");
                    break;
                }
                PassState::PassLimitReached => {
                    warn!(
                        passes = report.passes,
                        "reached the maximum number of removal passes; JavaScript may remain"
                    );
                    break;
                }
            };
        }

        Ok(report)
    }
}
