//! PDF JavaScript detection and removal

pub mod value;
pub mod walker;
pub mod classify;
pub mod locate;
pub mod remove;
pub mod scrub;
pub mod sanitize;

// Re-export commonly used items
pub use locate::{locate_javascript, AnchorKind, Finding, Scope, Target};
pub use remove::{remove_finding, Removal};
pub use scrub::{ScrubOptions, ScrubReport, Scrubber};
pub use sanitize::{check_file, load_document, sanitize_file, SanitizeOptions, SanitizeReport};
