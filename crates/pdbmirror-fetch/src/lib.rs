//! Retrieval of archive entries with decompression and atomic placement.
//!
//! The pieces, outermost first:
//! - [`Retriever`] - resolve, download, decompress, place
//! - [`Transport`] - byte acquisition, abstracted so tests inject mocks
//! - [`MirrorTree`] - the local directory layout
//! - [`gunzip_file`] - the gzip collaborator
//!
//! Placement is atomic: transfers are staged in the destination directory
//! and renamed into place, so an interrupted retrieval never leaves a
//! half-written entry.

mod error;
mod gunzip;
mod retrieve;
mod transport;
mod tree;

pub use error::{RetrievalError, TransportError};
pub use gunzip::gunzip_file;
pub use retrieve::{MAX_ASSEMBLY_INDEX, RetrieveOptions, Retriever};
pub use transport::Transport;
pub use tree::MirrorTree;

#[cfg(feature = "reqwest")]
pub use transport::ReqwestTransport;
