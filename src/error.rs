//! Error types for tagging and metadata lookups.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias used across the tagging library.
pub type Result<T> = std::result::Result<T, TagError>;

/// Everything that can go wrong while tagging a single entry.
///
/// Apart from [`TagError::Config`], none of these abort a batch run: the
/// batch processor logs them and moves on to the next entry.
#[derive(Error, Debug)]
pub enum TagError {
    /// A sidecar file or a looked-up movie is missing.
    #[error("not found: {0}")]
    NotFound(String),

    /// The rename destination already exists.
    #[error("cannot rename \"{from}\" to \"{to}\", directory already exists")]
    Conflict { from: String, to: String },

    #[error("could not access \"{}\": {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("there was an error renaming \"{from}\" to \"{to}\": {source}")]
    Rename {
        from: String,
        to: String,
        #[source]
        source: io::Error,
    },

    /// Invalid or contradictory options; fatal before any processing starts.
    #[error("configuration error: {0}")]
    Config(String),

    #[error("lookup failed: {0}")]
    Lookup(#[from] LookupError),
}

impl TagError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        TagError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors reported by a movie metadata backend.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("no movie with id {0}")]
    NotFound(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("could not parse response: {0}")]
    Parse(String),

    #[error("no API credential configured")]
    MissingCredential,
}

impl From<serde_json::Error> for LookupError {
    fn from(err: serde_json::Error) -> Self {
        LookupError::Parse(err.to_string())
    }
}
