//! Mirror, protocol and file-format tables for the wwPDB archive.
//!
//! Everything here is declarative data plus pure resolution:
//! - [`Protocol`] - the transports the mirror network speaks
//! - [`Server`] / [`ServerRegistry`] - the known mirrors and URL assembly
//! - [`FileFormat`] / [`FormatKey`] - per-format naming and layout rules
//! - [`MirrorConfig`] - optional external registry configuration
//! - [`parse_server_address`] - adapter for legacy string-form addresses
//!
//! No I/O happens in this crate beyond reading a configuration file.

mod config;
mod error;
mod format;
mod legacy;
mod protocol;
mod server;

pub use config::MirrorConfig;
pub use error::{Result, SourceError};
pub use format::{FileFormat, FormatKey, short_code};
pub use legacy::parse_server_address;
pub use protocol::Protocol;
pub use server::{
    DEFAULT_ARCHIVE_ROOT, DEFAULT_FTP_SUBDOMAIN, DEFAULT_HTTPS_SUBDOMAIN, Server, ServerRegistry,
};
