use std::{path::Path, sync::Arc};

use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::{
    ext::PathDisplayExt,
    filesystem::{FileAccess, FsError},
};

use super::annotations::{AnnotationTable, RichText, get_sidecar_path};

/// Outcome of a (re)load, for the collaborator to show to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigStatus {
    Loaded { items: usize },
    /// No sidecar document; silently unannotated.
    Missing,
    Malformed { diagnostic: String },
    Unreadable { diagnostic: String },
}

impl ConfigStatus {
    /// Message worth showing to the user, if any.
    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            ConfigStatus::Malformed { diagnostic } | ConfigStatus::Unreadable { diagnostic } => {
                Some(diagnostic.as_str())
            }
            ConfigStatus::Loaded { .. } | ConfigStatus::Missing => None,
        }
    }
}

/// Annotations as of one instant. Held for the duration of a render pass.
#[derive(Debug, Clone, Default)]
pub struct AnnotationSnapshot(Option<Arc<AnnotationTable>>);

impl AnnotationSnapshot {
    pub fn is_available(&self) -> bool {
        self.0.is_some()
    }

    pub fn describe(&self, name: &str) -> Option<String> {
        self.0.as_deref()?.describe(name)
    }

    pub fn tooltip(&self, name: &str) -> Option<RichText> {
        self.0.as_deref()?.tooltip(name)
    }
}

impl From<AnnotationTable> for AnnotationSnapshot {
    fn from(table: AnnotationTable) -> Self {
        Self(Some(Arc::new(table)))
    }
}

/// Current annotation table of the workspace.
///
/// A reload swaps the whole table; a failed reload leaves no table at all.
#[derive(Debug, Default)]
pub struct ConfigurationOverlay {
    current: RwLock<Option<Arc<AnnotationTable>>>,
}

impl ConfigurationOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> AnnotationSnapshot {
        AnnotationSnapshot(self.current.read().clone())
    }

    /// Replaces the table from raw document bytes. Never fails; a malformed document
    /// clears the annotations and is reported through the returned status.
    pub fn load_configuration(&self, contents: &[u8]) -> ConfigStatus {
        match AnnotationTable::parse(contents) {
            Ok(table) => {
                let items = table.len();
                *self.current.write() = Some(Arc::new(table));
                info!("Loaded {} annotations", items);
                ConfigStatus::Loaded { items }
            }
            Err(error) => {
                *self.current.write() = None;
                warn!("Ignoring sidecar document: {}", error);
                ConfigStatus::Malformed {
                    diagnostic: error.to_string(),
                }
            }
        }
    }

    pub fn clear(&self) {
        *self.current.write() = None;
    }

    /// Reads the sidecar document under `root` and loads it.
    pub async fn reload(&self, fs: &FileAccess, root: &Path) -> ConfigStatus {
        let path = get_sidecar_path(root);
        debug!("Reloading annotations from {}", path.lexical_display());

        match fs.read_file(&path).await {
            Ok(contents) => self.load_configuration(&contents),
            Err(FsError::NotFound { .. }) => {
                self.clear();
                debug!("No sidecar document, annotations disabled");
                ConfigStatus::Missing
            }
            Err(error) => {
                self.clear();
                warn!("Cannot read sidecar document: {}", error);
                ConfigStatus::Unreadable {
                    diagnostic: error.to_string(),
                }
            }
        }
    }

    pub fn describe(&self, name: &str) -> Option<String> {
        self.snapshot().describe(name)
    }

    pub fn tooltip(&self, name: &str) -> Option<RichText> {
        self.snapshot().tooltip(name)
    }
}
