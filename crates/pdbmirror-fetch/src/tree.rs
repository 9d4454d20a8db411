//! Local mirror tree layout.

use std::path::{Path, PathBuf};

use pdbmirror_source::{FileFormat, Result, short_code};

/// Where retrieved entries live on disk.
///
/// Current entries go under `root`, obsolete entries under a separate
/// obsolete tree (by default `root/obsolete`), both sharded by the
/// two-character short code unless `flat` is set. Local names always use
/// the uncompressed convention, whatever variant was transferred.
#[derive(Debug, Clone)]
pub struct MirrorTree {
    root: PathBuf,
    obsolete_root: PathBuf,
    flat: bool,
}

impl MirrorTree {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let obsolete_root = root.join("obsolete");
        Self {
            root,
            obsolete_root,
            flat: false,
        }
    }

    #[must_use]
    pub fn obsolete_root(mut self, obsolete_root: impl Into<PathBuf>) -> Self {
        self.obsolete_root = obsolete_root.into();
        self
    }

    /// Store entries directly under the root, without short-code sharding.
    #[must_use]
    pub fn flat(mut self, flat: bool) -> Self {
        self.flat = flat;
        self
    }

    pub fn root_path(&self) -> &Path {
        &self.root
    }

    pub fn obsolete_root_path(&self) -> &Path {
        &self.obsolete_root
    }

    /// Final local path of one entry.
    pub fn local_path(
        &self,
        format: &FileFormat,
        code: &str,
        obsolete: bool,
        index: Option<u32>,
    ) -> Result<PathBuf> {
        let name = format.file_name(code, false, index)?;
        let base = if obsolete { &self.obsolete_root } else { &self.root };
        let dir = if self.flat {
            base.clone()
        } else {
            base.join(short_code(code))
        };
        Ok(dir.join(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdbmirror_source::FormatKey;

    #[test]
    fn shards_by_short_code() {
        let tree = MirrorTree::new("/data/pdb");
        let path = tree
            .local_path(FormatKey::MmCif.format(), "127d", false, None)
            .unwrap();
        assert_eq!(path, PathBuf::from("/data/pdb/27/127d.cif"));
    }

    #[test]
    fn local_names_are_uncompressed() {
        let tree = MirrorTree::new("/data/pdb");
        let path = tree
            .local_path(FormatKey::Pdb.format(), "127d", false, None)
            .unwrap();
        assert_eq!(path.file_name().unwrap(), "pdb127d.ent");
    }

    #[test]
    fn obsolete_entries_get_their_own_tree() {
        let tree = MirrorTree::new("/data/pdb");
        let path = tree
            .local_path(FormatKey::MmCif.format(), "127d", true, None)
            .unwrap();
        assert_eq!(path, PathBuf::from("/data/pdb/obsolete/27/127d.cif"));
    }

    #[test]
    fn flat_mode_skips_sharding() {
        let tree = MirrorTree::new("/data/pdb").flat(true);
        let path = tree
            .local_path(FormatKey::MmCif.format(), "127d", false, None)
            .unwrap();
        assert_eq!(path, PathBuf::from("/data/pdb/127d.cif"));
    }

    #[test]
    fn index_errors_propagate() {
        let tree = MirrorTree::new("/data/pdb");
        assert!(
            tree.local_path(FormatKey::PdbAssembly.format(), "127d", false, None)
                .is_err()
        );
    }
}
