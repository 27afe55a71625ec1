//! Error types for the PDF sanitizer library

use std::path::PathBuf;
use lopdf::ObjectId;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the PDF sanitizer library
#[derive(Error, Debug)]
pub enum Error {
    /// File not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The input document could not be parsed
    #[error("Failed to load {}: {source}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: lopdf::Error,
    },

    /// The sanitized document could not be written
    #[error("Failed to save {}: {source}", .path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Trailer has no usable Root reference
    #[error("Document has no catalog (trailer /Root missing or not a reference)")]
    MissingCatalog,

    /// Indirect reference points at an object that is not in the document
    #[error("Unresolved reference to object {0:?}")]
    UnresolvedReference(ObjectId),

    /// Reference chain or nesting went deeper than the configured bound
    #[error("Depth limit of {limit} exceeded")]
    DepthExceeded { limit: usize },

    /// Input and output refer to the same file
    #[error("Input and output paths are the same: {}", .0.display())]
    SamePath(PathBuf),
}
