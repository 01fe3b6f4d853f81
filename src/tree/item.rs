use std::path::PathBuf;

use crate::config::{AnnotationSnapshot, RichText};

use super::Entry;

pub const OPEN_FILE_COMMAND: &str = "dirnotes.openFile";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collapsible {
    None,
    Collapsed,
}

/// Action the host invokes when a file item is activated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenCommand {
    pub command: &'static str,
    pub title: &'static str,
    pub target: PathBuf,
}

/// What the host renders for one visible entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeItem {
    pub label: String,
    pub path: PathBuf,
    pub collapsible: Collapsible,
    pub command: Option<OpenCommand>,
    pub context_value: &'static str,
    pub description: Option<String>,
    pub tooltip: Option<RichText>,
}

/// Names starting with `.` or `__` never get a display item.
pub fn is_hidden_name(name: &str) -> bool {
    name.starts_with('.') || name.starts_with("__")
}

impl TreeItem {
    /// Display item for `entry`, or `None` when the entry is hidden.
    pub fn for_entry(entry: &Entry, annotations: &AnnotationSnapshot) -> Option<Self> {
        let label = entry.name();
        if is_hidden_name(&label) {
            return None;
        }

        let (collapsible, command, context_value) = if entry.is_directory() {
            (Collapsible::Collapsed, None, "directory")
        } else {
            let command = OpenCommand {
                command: OPEN_FILE_COMMAND,
                title: "Open File",
                target: entry.path().to_path_buf(),
            };
            (Collapsible::None, Some(command), "file")
        };

        Some(Self {
            description: annotations.describe(&label),
            tooltip: annotations.tooltip(&label),
            label,
            path: entry.path().to_path_buf(),
            collapsible,
            command,
            context_value,
        })
    }
}

/// Display items for an already ordered listing, hidden entries removed.
pub fn display_items(entries: &[Entry], annotations: &AnnotationSnapshot) -> Vec<TreeItem> {
    entries
        .iter()
        .filter_map(|entry| TreeItem::for_entry(entry, annotations))
        .collect()
}
