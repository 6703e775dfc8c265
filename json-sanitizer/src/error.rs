//! Error types.
//!
//! Two families are kept apart:
//!
//! - [`SanitizeError`]: fatal I/O and configuration failures surfaced to the caller.
//! - [`DetectionError`]: failures of a PII detector. These are recovered locally:
//!   `Unavailable` during detector selection triggers the regex fallback, and any
//!   per-leaf error leaves the leaf untouched.

use std::{io, path::PathBuf};

/// Fatal errors returned by loading, saving and configuration.
#[derive(Debug, thiserror::Error)]
pub enum SanitizeError {
    #[error("failed to read `{path}`")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid JSON in `{path}`")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write `{path}`")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialize document")]
    Serialize(#[source] serde_json::Error),

    #[error("invalid configuration in `{path}`")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Errors produced by a [`crate::PiiDetector`].
#[derive(Debug, thiserror::Error)]
pub enum DetectionError {
    /// The detector could not be constructed or reached.
    #[error("detector unavailable: {0}")]
    Unavailable(String),

    /// The backing service failed while analyzing a leaf.
    #[error("detector backend failed: {0}")]
    Backend(String),

    /// The backend answered with something that could not be decoded.
    #[error("malformed detector response: {0}")]
    MalformedResponse(String),

    /// A reported span does not address a valid slice of the analyzed text.
    #[error("finding span {start}..{end} is invalid for text of {len} bytes")]
    InvalidSpan { start: usize, end: usize, len: usize },
}

pub type Result<T, E = SanitizeError> = std::result::Result<T, E>;
