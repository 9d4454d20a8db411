//! Error types for pdbmirror-fetch.

use std::io;

use thiserror::Error;

use pdbmirror_source::SourceError;

/// Transport-level failure. "Remote file absent" is kept distinguishable
/// from everything else so callers can tell the end of an assembly series
/// from a transient outage.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("remote file not found: {url}")]
    NotFound { url: String },

    #[error("unsupported URL scheme for this transport: {url}")]
    Scheme { url: String },

    #[error("transfer failed for {url}: {detail}")]
    Transfer { url: String, detail: String },

    #[error("i/o error writing download: {0}")]
    Io(#[from] io::Error),
}

/// Failure of one retrieval, carrying the entry code and format label.
#[derive(Debug, Error)]
pub enum RetrievalError {
    /// The archive has no file for this code/format variant.
    #[error("no remote file for entry {code} ({format})")]
    NotFound { code: String, format: String },

    #[error("failed to retrieve entry {code} ({format}): {source}")]
    Transport {
        code: String,
        format: String,
        #[source]
        source: TransportError,
    },

    #[error("failed to decompress entry {code} ({format}): {source}")]
    Decompress {
        code: String,
        format: String,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

impl RetrievalError {
    /// True when the failure is the remote reporting "no such file".
    pub fn is_not_found(&self) -> bool {
        matches!(self, RetrievalError::NotFound { .. })
    }
}
