use std::path::{Path, PathBuf};

use crate::{ext::PathDisplayExt, filesystem::EntryKind};

/// Identity of a node in the tree: absolute path plus the kind observed when it was
/// listed. Holds no links to parent or children.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Entry {
    path: PathBuf,
    kind: EntryKind,
}

impl Entry {
    pub fn new(path: impl Into<PathBuf>, kind: EntryKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    /// Base-name; the key for annotation lookups.
    pub fn name(&self) -> String {
        self.path.base_name()
    }

    pub fn is_directory(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}
