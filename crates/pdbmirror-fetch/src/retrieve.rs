//! Acquire-and-place orchestration.
//!
//! A retrieval resolves the remote URL and the final local path, skips the
//! download when the file is already present, and otherwise stages the
//! transfer in a temporary file next to the destination, decompresses it
//! when the transported variant was compressed, and renames it into place.
//! A failed retrieval never leaves a partial file at the destination.

use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use pdbmirror_source::{FileFormat, Protocol, Server};

use crate::error::{RetrievalError, TransportError};
use crate::gunzip::gunzip_file;
use crate::transport::Transport;
use crate::tree::MirrorTree;

/// Safety bound for the assembly index scan.
pub const MAX_ASSEMBLY_INDEX: u32 = 20;

/// Per-call retrieval options.
#[derive(Debug, Clone, Default)]
pub struct RetrieveOptions {
    /// Transfer the compressed variant (and decompress it locally).
    pub compressed: bool,
    /// Fetch the obsolete variant into the obsolete tree.
    pub obsolete: bool,
    /// File index for formats that number their files.
    pub index: Option<u32>,
    /// Re-download even when the file already exists locally.
    pub overwrite: bool,
    /// Place the file in this directory instead of the mirror tree layout.
    pub destination: Option<PathBuf>,
}

impl RetrieveOptions {
    #[must_use]
    pub fn compressed(mut self, compressed: bool) -> Self {
        self.compressed = compressed;
        self
    }

    #[must_use]
    pub fn obsolete(mut self, obsolete: bool) -> Self {
        self.obsolete = obsolete;
        self
    }

    #[must_use]
    pub fn index(mut self, index: u32) -> Self {
        self.index = Some(index);
        self
    }

    #[must_use]
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    #[must_use]
    pub fn destination(mut self, destination: impl Into<PathBuf>) -> Self {
        self.destination = Some(destination.into());
        self
    }
}

/// Drives retrievals against one transport and one local tree.
pub struct Retriever<T> {
    transport: T,
    tree: MirrorTree,
}

impl<T: Transport> Retriever<T> {
    pub fn new(transport: T, tree: MirrorTree) -> Self {
        Self { transport, tree }
    }

    pub fn tree(&self) -> &MirrorTree {
        &self.tree
    }

    /// Retrieve one entry and return its final local path.
    ///
    /// When the destination already exists and `overwrite` is off, the path
    /// is returned immediately without any network access.
    pub async fn retrieve(
        &self,
        server: &Server,
        protocol: Protocol,
        format: &FileFormat,
        code: &str,
        options: &RetrieveOptions,
    ) -> Result<PathBuf, RetrievalError> {
        let url = server.file_url(
            protocol,
            format,
            code,
            options.compressed,
            options.obsolete,
            options.index,
        )?;
        let local = match &options.destination {
            Some(dir) => dir.join(format.file_name(code, false, options.index)?),
            None => self
                .tree
                .local_path(format, code, options.obsolete, options.index)?,
        };

        if !options.overwrite && local.exists() {
            debug!(path = %local.display(), "entry already present, skipping download");
            return Ok(local);
        }

        let parent = local
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        tokio::fs::create_dir_all(&parent).await?;

        info!(code, format = format.label, %url, "retrieving entry");
        let staging = NamedTempFile::new_in(&parent)?;
        match self.transport.fetch(&url, staging.path()).await {
            Ok(()) => {}
            Err(TransportError::NotFound { .. }) => {
                debug!(code, format = format.label, %url, "remote file absent");
                return Err(RetrievalError::NotFound {
                    code: code.to_string(),
                    format: format.label.to_string(),
                });
            }
            Err(err) => {
                warn!(code, format = format.label, %err, "retrieval failed");
                return Err(RetrievalError::Transport {
                    code: code.to_string(),
                    format: format.label.to_string(),
                    source: err,
                });
            }
        }

        if options.compressed {
            let unpacked = NamedTempFile::new_in(&parent)?;
            gunzip_file(staging.path(), unpacked.path()).map_err(|err| {
                RetrievalError::Decompress {
                    code: code.to_string(),
                    format: format.label.to_string(),
                    source: err,
                }
            })?;
            unpacked
                .persist(&local)
                .map_err(|err| RetrievalError::Io(err.error))?;
            // `staging` drops here, removing the compressed artifact.
        } else {
            staging
                .persist(&local)
                .map_err(|err| RetrievalError::Io(err.error))?;
        }

        Ok(local)
    }

    /// Retrieve every assembly of `code`, scanning indices from 1 and
    /// stopping at the first missing one (or at [`MAX_ASSEMBLY_INDEX`]).
    ///
    /// Returns the successfully retrieved paths; an empty list means the
    /// entry has no assemblies.
    pub async fn retrieve_assemblies(
        &self,
        server: &Server,
        protocol: Protocol,
        format: &FileFormat,
        code: &str,
        options: &RetrieveOptions,
    ) -> Vec<PathBuf> {
        let mut paths = Vec::new();
        for index in 1..=MAX_ASSEMBLY_INDEX {
            let options = options.clone().index(index);
            match self
                .retrieve(server, protocol, format, code, &options)
                .await
            {
                Ok(path) => paths.push(path),
                Err(err) if err.is_not_found() => {
                    debug!(code, index, "no further assemblies");
                    break;
                }
                Err(err) => {
                    warn!(code, index, %err, "assembly retrieval failed");
                    break;
                }
            }
        }
        paths
    }

    /// Retrieve a batch of entries. A failing code is logged and skipped;
    /// the successfully retrieved paths are returned.
    pub async fn retrieve_many(
        &self,
        server: &Server,
        protocol: Protocol,
        format: &FileFormat,
        codes: &[String],
        options: &RetrieveOptions,
    ) -> Vec<PathBuf> {
        let mut paths = Vec::new();
        for code in codes {
            match self
                .retrieve(server, protocol, format, code, options)
                .await
            {
                Ok(path) => paths.push(path),
                Err(err) => warn!(code = %code, %err, "skipping entry"),
            }
        }
        paths
    }
}
