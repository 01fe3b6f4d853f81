use std::path::{Component, Path, PathBuf};

use derive_more::Display;
use tracing::debug;

use crate::{
    ext::PathDisplayExt,
    filesystem::{FileAccess, normalize_os_name},
};

/// The two kinds of callback an OS watcher delivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawEventKind {
    /// Content or metadata of an existing path changed.
    Change,
    /// Something appeared or disappeared; which one is not known.
    Rename,
}

/// One raw watcher callback: a kind and a name relative to the watched root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawWatchEvent {
    pub kind: RawEventKind,
    pub name: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ChangeKind {
    #[display("created")]
    Created,
    #[display("changed")]
    Changed,
    #[display("deleted")]
    Deleted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub path: PathBuf,
}

/// Classifies raw callbacks for one watched root.
#[derive(Debug, Clone)]
pub struct ChangeTranslator {
    root: PathBuf,
    fs: FileAccess,
}

impl ChangeTranslator {
    pub fn new(root: impl Into<PathBuf>, fs: FileAccess) -> Self {
        Self {
            root: root.into(),
            fs,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of a raw callback name, with every component normalized.
    pub fn resolve(&self, name: &Path) -> PathBuf {
        name.components()
            .fold(self.root.clone(), |mut path, component| {
                match component {
                    Component::Normal(part) => {
                        path.push(normalize_os_name(&part.to_string_lossy()))
                    }
                    other => path.push(other.as_os_str()),
                }
                path
            })
    }

    /// One event per callback. Rename-class callbacks are settled by checking whether
    /// the path exists right now.
    pub async fn translate(&self, raw: RawWatchEvent) -> ChangeEvent {
        let path = self.resolve(&raw.name);
        let kind = match raw.kind {
            RawEventKind::Change => ChangeKind::Changed,
            RawEventKind::Rename if self.fs.path_exists(&path).await => ChangeKind::Created,
            RawEventKind::Rename => ChangeKind::Deleted,
        };

        debug!("Classified {} as {}", path.lexical_display(), kind);
        ChangeEvent { kind, path }
    }
}
