use std::time::SystemTime;

use derive_more::Display;

/// Kind of a filesystem object, as reported by the OS at the time of the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
pub enum EntryKind {
    #[display("file")]
    File,
    #[display("directory")]
    Directory,
    #[display("symlink")]
    SymbolicLink,
    #[display("unknown")]
    Unknown,
}

/// Read-only view of OS metadata. Recomputed on every query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stat {
    pub kind: EntryKind,
    pub size: u64,
    pub created: Option<SystemTime>,
    pub modified: Option<SystemTime>,
}

impl Stat {
    pub(crate) fn from_metadata(metadata: &compio::fs::Metadata) -> Self {
        let kind = if metadata.is_symlink() {
            EntryKind::SymbolicLink
        } else if metadata.is_dir() {
            EntryKind::Directory
        } else if metadata.is_file() {
            EntryKind::File
        } else {
            EntryKind::Unknown
        };

        Self {
            kind,
            size: metadata.len(),
            created: metadata.created().ok(),
            modified: metadata.modified().ok(),
        }
    }

    pub fn is_directory(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}
