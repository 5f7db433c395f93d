//! Crate error types
//!
//! The fallible seams are narrow: binding the listener, socket I/O on a
//! session, and writing the history file. Everything else (corrupt history on
//! load, per-member delivery failures) is handled in place and never surfaces
//! as an error.

/// Error type for server, session, and persistence operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Socket or file I/O failure
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// History map could not be encoded for the on-disk snapshot
    #[error("history serialization failed: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Convenience result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
