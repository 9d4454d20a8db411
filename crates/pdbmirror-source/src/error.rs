use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    /// The requested variant is outside the format's declared capabilities.
    /// Always caller-fixable, never worth retrying.
    #[error("format {format} does not support this request: {reason}")]
    IncompatibleRequest { format: String, reason: String },

    #[error("unsupported protocol: {detail}")]
    UnsupportedProtocol { detail: String },

    #[error("unsupported server: {detail}")]
    UnsupportedServer { detail: String },

    #[error("failed to load mirror configuration from {path}: {detail}")]
    Configuration { path: PathBuf, detail: String },
}

pub type Result<T> = std::result::Result<T, SourceError>;
