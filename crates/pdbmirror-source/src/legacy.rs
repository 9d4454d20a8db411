//! Backwards compatibility for string-form server addresses.
//!
//! Early releases accepted a single string such as `"ftp://ftp.wwpdb.org"`
//! where a `(Server, Protocol)` pair is expected today. This adapter maps
//! those strings onto the registry; it is deliberately kept out of the main
//! resolution path.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Result, SourceError};
use crate::protocol::Protocol;
use crate::server::{Server, ServerRegistry};

static ADDRESS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<protocol>\w+)://(ftp\.)?(?P<domain>[^/]+?)/?$").unwrap());

/// Parse a legacy address like `"ftp://ftp.wwpdb.org"` into the matching
/// registry entry and protocol.
///
/// An address whose scheme names no known protocol fails with
/// [`SourceError::UnsupportedProtocol`]; an address that does not parse, or
/// whose domain is not in the registry, fails with
/// [`SourceError::UnsupportedServer`].
pub fn parse_server_address(
    address: &str,
    registry: &ServerRegistry,
) -> Result<(Server, Protocol)> {
    let normalized = address.trim().to_ascii_lowercase();
    let captures =
        ADDRESS_RE
            .captures(&normalized)
            .ok_or_else(|| SourceError::UnsupportedServer {
                detail: address.to_string(),
            })?;

    let protocol = Protocol::from_name(&captures["protocol"])?;
    let domain = &captures["domain"];
    let server = registry
        .by_domain(domain)
        .ok_or_else(|| SourceError::UnsupportedServer {
            detail: format!("no known mirror for domain {domain} (address: {address})"),
        })?;

    Ok((server.clone(), protocol))
}
