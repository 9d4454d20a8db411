//! Declarative registry of archive file formats.
//!
//! Each format is a plain immutable record describing how its files are
//! named and where they live in the archive tree. Resolution is pure string
//! templating over `{code}`, `{short_code}`, `{filename}` and `{index}`;
//! there is no behavioral polymorphism, only the two field-presence switches
//! (obsolete directory, compressed extension).

use std::collections::BTreeMap;
use std::fmt;

use once_cell::sync::Lazy;

use crate::error::{Result, SourceError};
use crate::protocol::Protocol;

/// Naming and layout rules for one archive file format.
///
/// `compressed_extension` distinguishes three states: `Some("gz")` (the
/// usual suffixed gzip variant), `Some("")` (the file is compressed but
/// carries no suffix, as MMTF does) and `None` (no compressed variant
/// exists at all).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFormat {
    pub label: &'static str,
    /// May embed `{index}` for formats that number their files.
    pub extension: &'static str,
    pub filename_pattern: &'static str,
    pub directory_pattern: &'static str,
    /// Obsolete variants are assumed to exist iff this is set.
    pub obsolete_directory_pattern: Option<&'static str>,
    pub compressed_extension: Option<&'static str>,
    /// Several files per entry, numbered by a mandatory `index >= 1`.
    pub multiple_files: bool,
    /// Overrides the protocol-derived subdomain when set.
    pub subdomain: Option<&'static str>,
    /// Whether the server's archive root prefixes `directory_pattern`.
    pub under_archive_root: bool,
    /// Server ids the format is restricted to; `None` means every mirror.
    pub servers: Option<&'static [&'static str]>,
    /// Protocols the format is restricted to; `None` means all of them.
    pub protocols: Option<&'static [Protocol]>,
}

const DEFAULTS: FileFormat = FileFormat {
    label: "",
    extension: "",
    filename_pattern: "{code}",
    directory_pattern: "",
    obsolete_directory_pattern: None,
    compressed_extension: Some("gz"),
    multiple_files: false,
    subdomain: None,
    under_archive_root: true,
    servers: None,
    protocols: None,
};

impl FileFormat {
    pub fn has_obsolete(&self) -> bool {
        self.obsolete_directory_pattern.is_some()
    }

    pub fn has_compressed(&self) -> bool {
        self.compressed_extension.is_some()
    }

    pub fn allows_protocol(&self, protocol: Protocol) -> bool {
        self.protocols.is_none_or(|p| p.contains(&protocol))
    }

    pub fn allows_server(&self, code: &str) -> bool {
        self.servers.is_none_or(|s| s.iter().any(|c| *c == code))
    }

    pub fn allowed_protocols(&self) -> &'static [Protocol] {
        self.protocols.unwrap_or(&Protocol::ALL)
    }

    /// File name of one entry, e.g. `127d.cif.gz`.
    ///
    /// Fails when a compressed variant is requested but none exists, or when
    /// the format numbers its files and no positive `index` was given.
    pub fn file_name(&self, code: &str, compressed: bool, index: Option<u32>) -> Result<String> {
        if compressed && !self.has_compressed() {
            return Err(SourceError::IncompatibleRequest {
                format: self.label.to_string(),
                reason: "no compressed variant exists".to_string(),
            });
        }
        if self.multiple_files && index.is_none_or(|i| i == 0) {
            return Err(SourceError::IncompatibleRequest {
                format: self.label.to_string(),
                reason: "a file index >= 1 is required".to_string(),
            });
        }

        let mut name = fill(self.filename_pattern, code, "", "", index);
        let extension = fill(self.extension, code, "", "", index);
        if !extension.is_empty() {
            name.push('.');
            name.push_str(&extension);
        }
        if compressed {
            match self.compressed_extension {
                Some(suffix) if !suffix.is_empty() => {
                    name.push('.');
                    name.push_str(suffix);
                }
                _ => {}
            }
        }
        Ok(name)
    }

    /// Path of one entry below the archive root (or below `/` for formats
    /// living outside it), e.g. `/data/structures/divided/mmCIF/27/127d.cif`.
    pub fn remote_path(
        &self,
        code: &str,
        compressed: bool,
        obsolete: bool,
        index: Option<u32>,
    ) -> Result<String> {
        if obsolete && !self.has_obsolete() {
            return Err(SourceError::IncompatibleRequest {
                format: self.label.to_string(),
                reason: "no obsolete variant exists".to_string(),
            });
        }

        let filename = self.file_name(code, compressed, index)?;
        let pattern = if obsolete {
            self.obsolete_directory_pattern
                .unwrap_or(self.directory_pattern)
        } else {
            self.directory_pattern
        };
        Ok(fill(pattern, code, short_code(code), &filename, index))
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label)
    }
}

/// Two-character directory bucket: the middle characters of the
/// 4-character structure code.
pub fn short_code(code: &str) -> &str {
    code.get(1..3).unwrap_or(code)
}

fn fill(pattern: &str, code: &str, short_code: &str, filename: &str, index: Option<u32>) -> String {
    let mut out = pattern.replace("{code}", code);
    if pattern.contains("{short_code}") {
        out = out.replace("{short_code}", short_code);
    }
    if pattern.contains("{filename}") {
        out = out.replace("{filename}", filename);
    }
    if let Some(index) = index {
        out = out.replace("{index}", &index.to_string());
    }
    out
}

/// Identifier of a built-in format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormatKey {
    Pdb,
    PdbAssembly,
    MmCif,
    MmCifAssembly,
    Pdbml,
    PdbBundle,
    Mmtf,
}

impl FormatKey {
    pub const ALL: [FormatKey; 7] = [
        FormatKey::Pdb,
        FormatKey::PdbAssembly,
        FormatKey::MmCif,
        FormatKey::MmCifAssembly,
        FormatKey::Pdbml,
        FormatKey::PdbBundle,
        FormatKey::Mmtf,
    ];

    pub fn format(self) -> &'static FileFormat {
        &CATALOG[&self]
    }

    pub fn cli_name(self) -> &'static str {
        match self {
            FormatKey::Pdb => "pdb",
            FormatKey::PdbAssembly => "pdb-assembly",
            FormatKey::MmCif => "mmcif",
            FormatKey::MmCifAssembly => "mmcif-assembly",
            FormatKey::Pdbml => "pdbml",
            FormatKey::PdbBundle => "bundle",
            FormatKey::Mmtf => "mmtf",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "pdb" => Some(FormatKey::Pdb),
            "pdb-assembly" | "pdb_assembly" => Some(FormatKey::PdbAssembly),
            "mmcif" => Some(FormatKey::MmCif),
            "mmcif-assembly" | "mmcif_assembly" => Some(FormatKey::MmCifAssembly),
            "pdbml" | "xml" => Some(FormatKey::Pdbml),
            "bundle" | "pdb-bundle" => Some(FormatKey::PdbBundle),
            "mmtf" => Some(FormatKey::Mmtf),
            _ => None,
        }
    }

    /// The assembly sibling of this format, when one exists.
    pub fn assembly_variant(self) -> Option<FormatKey> {
        match self {
            FormatKey::Pdb | FormatKey::PdbAssembly => Some(FormatKey::PdbAssembly),
            FormatKey::MmCif | FormatKey::MmCifAssembly => Some(FormatKey::MmCifAssembly),
            _ => None,
        }
    }
}

/// The built-in formats, reproducing the archive's published conventions.
static CATALOG: Lazy<BTreeMap<FormatKey, FileFormat>> = Lazy::new(|| {
    BTreeMap::from([
        // Legacy single-entry format.
        (
            FormatKey::Pdb,
            FileFormat {
                label: "PDB",
                extension: "ent",
                filename_pattern: "pdb{code}",
                directory_pattern: "/data/structures/divided/pdb/{short_code}/{filename}",
                obsolete_directory_pattern: Some(
                    "/data/structures/obsolete/pdb/{short_code}/{filename}",
                ),
                ..DEFAULTS
            },
        ),
        // Biological assemblies in PDB format, one numbered file each.
        (
            FormatKey::PdbAssembly,
            FileFormat {
                label: "PDB (biological assembly)",
                extension: "pdb{index}",
                directory_pattern: "/data/biounit/PDB/divided/{short_code}/{filename}",
                multiple_files: true,
                ..DEFAULTS
            },
        ),
        // Default archive format since 2014.
        (
            FormatKey::MmCif,
            FileFormat {
                label: "PDBx/mmCIF",
                extension: "cif",
                directory_pattern: "/data/structures/divided/mmCIF/{short_code}/{filename}",
                obsolete_directory_pattern: Some(
                    "/data/structures/obsolete/mmCIF/{short_code}/{filename}",
                ),
                ..DEFAULTS
            },
        ),
        (
            FormatKey::MmCifAssembly,
            FileFormat {
                label: "PDBx/mmCIF (biological assembly)",
                extension: "cif",
                filename_pattern: "{code}-assembly{index}",
                directory_pattern: "/data/assemblies/mmCIF/divided/{short_code}/{filename}",
                multiple_files: true,
                ..DEFAULTS
            },
        ),
        (
            FormatKey::Pdbml,
            FileFormat {
                label: "PDBML/XML",
                extension: "xml",
                directory_pattern: "/data/structures/divided/XML/{short_code}/{filename}",
                obsolete_directory_pattern: Some(
                    "/data/structures/obsolete/XML/{short_code}/{filename}",
                ),
                ..DEFAULTS
            },
        ),
        // TAR collections for entries too large for legacy PDB files.
        (
            FormatKey::PdbBundle,
            FileFormat {
                label: "PDB bundle",
                extension: "tar",
                filename_pattern: "{code}-pdb-bundle",
                directory_pattern: "/compatible/pdb_bundle/{short_code}/{code}/{filename}",
                ..DEFAULTS
            },
        ),
        // Compact binary format; one dedicated HTTPS endpoint, compressed
        // files served without any suffix, outside the archive root.
        (
            FormatKey::Mmtf,
            FileFormat {
                label: "MMTF",
                extension: "",
                directory_pattern: "/v1.0/full/{filename}",
                compressed_extension: Some(""),
                subdomain: Some("mmtf"),
                under_archive_root: false,
                servers: Some(&["US"]),
                protocols: Some(&[Protocol::Https]),
                ..DEFAULTS
            },
        ),
    ])
});
