//! Structured error types for the pepgeom workspace.

use thiserror::Error;

/// Unified error type for all pepgeom operations.
#[derive(Debug, Error)]
pub enum PepgeomError {
    /// I/O error (file not found, permission denied, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error (malformed structure file or selection line)
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid input (bad arguments, out-of-range values)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Compression or decompression failure
    #[error("compression error: {0}")]
    Compression(String),

    /// Coordinates that cannot take part in a geometric computation
    #[error("geometry error: {0}")]
    Geometry(String),

    /// The secondary-structure classifier failed or returned nothing usable
    #[error("classifier error: {0}")]
    Classifier(String),

    /// The result store rejected a read, write or commit
    #[error("store error: {0}")]
    Store(String),

    /// Catch-all for other errors
    #[error("{0}")]
    Other(String),
}

impl PepgeomError {
    /// Wrap an I/O error with the path it concerns.
    pub fn io_at(path: &std::path::Path, err: std::io::Error) -> Self {
        PepgeomError::Io(std::io::Error::new(
            err.kind(),
            format!("{}: {}", path.display(), err),
        ))
    }
}

/// Convenience alias used throughout the pepgeom workspace.
pub type Result<T> = std::result::Result<T, PepgeomError>;
