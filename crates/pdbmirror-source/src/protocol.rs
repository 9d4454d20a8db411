use std::fmt;

use crate::error::{Result, SourceError};

/// Transport protocol for reaching an archive mirror.
///
/// The discriminant is the protocol's well-known port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum Protocol {
    Https = 443,
    Ftp = 21,
}

impl Protocol {
    pub const ALL: [Protocol; 2] = [Protocol::Https, Protocol::Ftp];

    pub fn port(self) -> u16 {
        self as u16
    }

    pub fn name(self) -> &'static str {
        match self {
            Protocol::Https => "HTTPS",
            Protocol::Ftp => "FTP",
        }
    }

    /// URL scheme, e.g. `https`.
    pub fn scheme(self) -> &'static str {
        match self {
            Protocol::Https => "https",
            Protocol::Ftp => "ftp",
        }
    }

    /// Scheme prefix for URL assembly, e.g. `https://`.
    pub fn url_prefix(self) -> &'static str {
        match self {
            Protocol::Https => "https://",
            Protocol::Ftp => "ftp://",
        }
    }

    /// Case-insensitive lookup by protocol name or URL scheme.
    pub fn from_name(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "https" => Ok(Protocol::Https),
            "ftp" => Ok(Protocol::Ftp),
            _ => Err(SourceError::UnsupportedProtocol {
                detail: format!("{name} (supported: HTTPS, FTP)"),
            }),
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.port())
    }
}
