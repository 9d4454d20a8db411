//! Static mirror-network configuration.
//!
//! The registry can be loaded once at startup from a JSON document of the
//! shape
//!
//! ```json
//! {
//!   "default": { "protocol": "HTTPS" },
//!   "servers": {
//!     "WW": { "domain": "wwpdb.org", "label": "Worldwide", "archive_root": "/pub/pdb" }
//!   }
//! }
//! ```
//!
//! Any load or parse failure surfaces as [`SourceError::Configuration`]
//! naming the offending file.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Result, SourceError};
use crate::protocol::Protocol;
use crate::server::{DEFAULT_FTP_SUBDOMAIN, DEFAULT_HTTPS_SUBDOMAIN, Server, ServerRegistry};

#[derive(Debug, Clone, Deserialize)]
pub struct MirrorConfig {
    pub default: DefaultSection,
    pub servers: BTreeMap<String, ServerSection>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DefaultSection {
    pub protocol: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSection {
    pub domain: String,
    pub label: String,
    pub archive_root: String,
    #[serde(default = "default_ftp_subdomain")]
    pub ftp_subdomain: String,
    #[serde(default = "default_https_subdomain")]
    pub https_subdomain: String,
}

fn default_ftp_subdomain() -> String {
    DEFAULT_FTP_SUBDOMAIN.to_string()
}

fn default_https_subdomain() -> String {
    DEFAULT_HTTPS_SUBDOMAIN.to_string()
}

impl MirrorConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|err| SourceError::Configuration {
            path: path.to_path_buf(),
            detail: err.to_string(),
        })?;
        serde_json::from_str(&raw).map_err(|err| SourceError::Configuration {
            path: path.to_path_buf(),
            detail: err.to_string(),
        })
    }

    pub fn into_registry(self) -> Result<ServerRegistry> {
        let default_protocol = Protocol::from_name(&self.default.protocol)?;
        let servers = self
            .servers
            .into_iter()
            .map(|(code, section)| Server {
                code,
                domain: section.domain,
                label: section.label,
                archive_root: section.archive_root,
                ftp_subdomain: section.ftp_subdomain,
                https_subdomain: section.https_subdomain,
            })
            .collect();
        Ok(ServerRegistry::new(servers, default_protocol))
    }
}

impl ServerRegistry {
    /// Load the registry from a JSON configuration file.
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self> {
        MirrorConfig::load(path)?.into_registry()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_a_minimal_registry() {
        let file = write_config(
            r#"{
                "default": { "protocol": "FTP" },
                "servers": {
                    "XX": { "domain": "example.org", "label": "Example", "archive_root": "/pub/pdb" }
                }
            }"#,
        );
        let registry = ServerRegistry::from_config_file(file.path()).unwrap();
        assert_eq!(registry.default_protocol(), Protocol::Ftp);
        let server = registry.get("XX").unwrap();
        assert_eq!(server.domain, "example.org");
        assert_eq!(server.ftp_subdomain, "ftp");
        assert_eq!(server.https_subdomain, "files");
    }

    #[test]
    fn subdomain_overrides_are_honored() {
        let file = write_config(
            r#"{
                "default": { "protocol": "HTTPS" },
                "servers": {
                    "XX": {
                        "domain": "example.org",
                        "label": "Example",
                        "archive_root": "/pub/pdb",
                        "https_subdomain": "data"
                    }
                }
            }"#,
        );
        let registry = ServerRegistry::from_config_file(file.path()).unwrap();
        assert_eq!(registry.get("XX").unwrap().https_subdomain, "data");
    }

    #[test]
    fn missing_field_is_a_configuration_error() {
        let file = write_config(r#"{ "default": {}, "servers": {} }"#);
        let err = ServerRegistry::from_config_file(file.path()).unwrap_err();
        assert!(matches!(err, SourceError::Configuration { .. }));
        assert!(err.to_string().contains("protocol"));
    }

    #[test]
    fn missing_file_is_a_configuration_error() {
        let err = ServerRegistry::from_config_file("/nonexistent/mirrors.json").unwrap_err();
        match err {
            SourceError::Configuration { path, .. } => {
                assert!(path.to_string_lossy().contains("mirrors.json"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unknown_default_protocol_is_rejected() {
        let file = write_config(
            r#"{
                "default": { "protocol": "GOPHER" },
                "servers": {}
            }"#,
        );
        assert!(matches!(
            ServerRegistry::from_config_file(file.path()),
            Err(SourceError::UnsupportedProtocol { .. })
        ));
    }
}
