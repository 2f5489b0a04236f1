//! Core trait definitions for the pepgeom workspace.

/// A type that can produce a summary of its contents.
pub trait Summarizable {
    /// A one-line summary suitable for display or a log line.
    fn summary(&self) -> String;
}
