//! Shared primitives for the pepgeom protein-geometry workspace.
//!
//! `pepgeom-core` provides the foundation the other crates build on:
//!
//! - **Error types**: [`PepgeomError`] and [`Result`] for structured error handling
//! - **Traits**: [`Summarizable`] for one-line log summaries
//! - **Hashing**: SHA-256 digests of source files
//! - **Compression**: zstd and gzip with algorithm auto-detection (std feature only)

pub mod error;
pub mod hash;
pub mod traits;

#[cfg(feature = "std")]
pub mod compress;

pub use error::{PepgeomError, Result};
pub use traits::*;
