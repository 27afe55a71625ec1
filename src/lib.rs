//! PDF Sanitizer Library
//!
//! A cross-platform library for finding and removing JavaScript actions in PDFs.
//! This library provides functionality to:
//! - Walk a document's object graph without looping on reference cycles
//! - Locate JavaScript actions at every place a PDF can attach them
//!   (OpenAction, additional-actions maps, annotation and outline actions,
//!   the JavaScript name tree, action chains)
//! - Remove them in repeated passes until a scan comes back clean
//!
//! # Example
//!
//! ```no_run
//! use pdf_sanitizer::pdf::{sanitize_file, SanitizeOptions, ScrubOptions};
//! use std::path::PathBuf;
//!
//! let options = SanitizeOptions {
//!     input_path: PathBuf::from("invoice.pdf"),
//!     output_path: PathBuf::from("invoice-clean.pdf"),
//!     scrub: ScrubOptions::default(),
//! };
//!
//! let report = sanitize_file(&options).expect("Failed to sanitize PDF");
//! println!("Removed {} JavaScript actions", report.scrub.removed.len());
//! ```

pub mod error;
pub mod pdf;

// Re-export commonly used items
pub use error::{Error, Result};
