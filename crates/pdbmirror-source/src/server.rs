//! Archive mirror servers and URL assembly.

use std::fmt;

use crate::error::{Result, SourceError};
use crate::format::FileFormat;
use crate::protocol::Protocol;

pub const DEFAULT_ARCHIVE_ROOT: &str = "/pub/pdb";
pub const DEFAULT_FTP_SUBDOMAIN: &str = "ftp";
pub const DEFAULT_HTTPS_SUBDOMAIN: &str = "files";

/// One mirror of the archive.
///
/// Plain value semantics; equality and hashing cover every field so a
/// server can key the probe cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Server {
    pub code: String,
    pub domain: String,
    pub label: String,
    /// Base path under which the format directories are rooted.
    pub archive_root: String,
    pub ftp_subdomain: String,
    pub https_subdomain: String,
}

impl Server {
    fn build(
        code: &str,
        domain: &str,
        label: &str,
        archive_root: &str,
        ftp_subdomain: &str,
        https_subdomain: &str,
    ) -> Self {
        Self {
            code: code.to_string(),
            domain: domain.to_string(),
            label: label.to_string(),
            archive_root: archive_root.to_string(),
            ftp_subdomain: ftp_subdomain.to_string(),
            https_subdomain: https_subdomain.to_string(),
        }
    }

    /// Subdomain serving `format` under `protocol`. A format-level override
    /// takes precedence over the protocol-derived subdomain.
    pub fn subdomain(&self, protocol: Protocol, format: Option<&FileFormat>) -> &str {
        if let Some(subdomain) = format.and_then(|f| f.subdomain) {
            return subdomain;
        }
        match protocol {
            Protocol::Ftp => &self.ftp_subdomain,
            Protocol::Https => &self.https_subdomain,
        }
    }

    /// Full host name for `format` under `protocol`, e.g. `files.rcsb.org`.
    pub fn host(&self, protocol: Protocol, format: Option<&FileFormat>) -> String {
        format!("{}.{}", self.subdomain(protocol, format), self.domain)
    }

    /// URL of the server's archive root, e.g. `ftp://ftp.wwpdb.org/pub/pdb`.
    pub fn directory_url(&self, protocol: Protocol) -> String {
        format!(
            "{}{}{}",
            protocol.url_prefix(),
            self.host(protocol, None),
            self.archive_root
        )
    }

    /// Absolute URL of one archive file.
    ///
    /// Fails when the format is not served over `protocol` or not hosted on
    /// this mirror; format-level resolution errors propagate unchanged.
    pub fn file_url(
        &self,
        protocol: Protocol,
        format: &FileFormat,
        code: &str,
        compressed: bool,
        obsolete: bool,
        index: Option<u32>,
    ) -> Result<String> {
        if !format.allows_protocol(protocol) {
            return Err(SourceError::UnsupportedProtocol {
                detail: format!("{protocol} is not available for format {format} on {}", self),
            });
        }
        if !format.allows_server(&self.code) {
            return Err(SourceError::UnsupportedServer {
                detail: format!("{} does not serve format {format}", self),
            });
        }

        let path = format.remote_path(code, compressed, obsolete, index)?;
        let root = if format.under_archive_root {
            self.archive_root.as_str()
        } else {
            ""
        };
        Ok(format!(
            "{}{}{}{}",
            protocol.url_prefix(),
            self.host(protocol, Some(format)),
            root,
            path
        ))
    }
}

impl fmt::Display for Server {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label, self.domain)
    }
}

/// Read-only table of known mirrors plus the default protocol, built once
/// at startup and never mutated.
#[derive(Debug, Clone)]
pub struct ServerRegistry {
    servers: Vec<Server>,
    default_protocol: Protocol,
}

impl ServerRegistry {
    pub fn new(servers: Vec<Server>, default_protocol: Protocol) -> Self {
        Self {
            servers,
            default_protocol,
        }
    }

    /// The hard-coded mirror network.
    pub fn builtin() -> Self {
        Self::new(
            vec![
                Server::build(
                    "WW",
                    "wwpdb.org",
                    "Worldwide",
                    DEFAULT_ARCHIVE_ROOT,
                    DEFAULT_FTP_SUBDOMAIN,
                    DEFAULT_HTTPS_SUBDOMAIN,
                ),
                Server::build(
                    "US",
                    "rcsb.org",
                    "United States",
                    DEFAULT_ARCHIVE_ROOT,
                    DEFAULT_FTP_SUBDOMAIN,
                    DEFAULT_HTTPS_SUBDOMAIN,
                ),
                Server::build(
                    "UK",
                    "ebi.ac.uk",
                    "United Kingdom",
                    "/pub/databases/pdb",
                    DEFAULT_FTP_SUBDOMAIN,
                    "ftp",
                ),
                Server::build(
                    "JP",
                    "pdbj.org",
                    "Japan",
                    DEFAULT_ARCHIVE_ROOT,
                    DEFAULT_FTP_SUBDOMAIN,
                    "data.pdbjbk1",
                ),
            ],
            Protocol::Https,
        )
    }

    pub fn servers(&self) -> &[Server] {
        &self.servers
    }

    pub fn default_protocol(&self) -> Protocol {
        self.default_protocol
    }

    /// Lookup by registry id, e.g. `"WW"`.
    pub fn get(&self, code: &str) -> Option<&Server> {
        self.servers.iter().find(|s| s.code == code)
    }

    pub fn by_domain(&self, domain: &str) -> Option<&Server> {
        self.servers.iter().find(|s| s.domain == domain)
    }

    /// Mirrors eligible to serve `format`, in registry order.
    pub fn candidates(&self, format: &FileFormat) -> Vec<Server> {
        self.servers
            .iter()
            .filter(|s| format.allows_server(&s.code))
            .cloned()
            .collect()
    }
}
