use std::{
    collections::{BTreeMap, HashMap},
    path::{Path, PathBuf},
};

use derive_more::Display;
use serde::Deserialize;
use snafu::prelude::*;
use tracing::debug;

use crate::filesystem::to_composed;

pub const SIDECAR_FILE_NAME: &str = ".dirnotes.json";

pub fn get_sidecar_path(root: &Path) -> PathBuf {
    root.join(SIDECAR_FILE_NAME)
}

/// Human-authored metadata attached to every entry with a given base-name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AnnotationRecord {
    pub label: String,
    #[serde(default)]
    pub environment: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct SidecarDocument {
    #[serde(default)]
    items: BTreeMap<String, AnnotationRecord>,
    #[serde(default)]
    environments: HashMap<String, String>,
    #[serde(default)]
    types: HashMap<String, String>,
}

/// Markdown rendering of an annotation, for hover text.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub struct RichText(String);

impl RichText {
    pub fn as_markdown(&self) -> &str {
        &self.0
    }
}

/// Validated contents of a sidecar document, keyed by composed base-name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationTable {
    items: HashMap<String, AnnotationRecord>,
    environments: HashMap<String, String>,
    types: HashMap<String, String>,
}

impl AnnotationTable {
    pub fn parse(contents: &[u8]) -> Result<Self, AnnotationParseError> {
        let document: SidecarDocument = serde_json::from_slice(contents).context(ParseSnafu)?;

        let mut items = HashMap::with_capacity(document.items.len());
        for (name, record) in document.items {
            let composed = to_composed(&name);
            // An explicitly composed key wins over a decomposed spelling of the same name.
            if composed == name || !items.contains_key(&composed) {
                items.insert(composed, record);
            } else {
                debug!("Skipping duplicate annotation for '{}'", composed);
            }
        }

        Ok(Self {
            items,
            environments: document.environments,
            types: document.types,
        })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn record(&self, name: &str) -> Option<&AnnotationRecord> {
        self.items.get(&to_composed(name))
    }

    /// `"<environment icon> <type icon> <label>"`, omitting icons that do not resolve.
    pub fn describe(&self, name: &str) -> Option<String> {
        let record = self.record(name)?;
        let mut description = String::new();

        let icons = [
            lookup_icon(&self.environments, record.environment.as_deref()),
            lookup_icon(&self.types, record.kind.as_deref()),
        ];
        for icon in icons.into_iter().flatten() {
            description.push_str(icon);
            description.push(' ');
        }
        description.push_str(&record.label);

        Some(description)
    }

    pub fn tooltip(&self, name: &str) -> Option<RichText> {
        let record = self.record(name)?;
        let mut markdown = format!("**{}**", record.label);

        if let Some(environment) = record.environment.as_deref() {
            markdown.push(' ');
            markdown.push_str(&tag(self.environments.get(environment), environment));
        }
        if let Some(kind) = record.kind.as_deref() {
            markdown.push(' ');
            markdown.push_str(&tag(self.types.get(kind), kind));
        }
        if let Some(description) = record.description.as_deref() {
            markdown.push_str("\n\n");
            markdown.push_str(&code_block(description));
        }

        Some(RichText(markdown))
    }
}

impl TryFrom<&str> for AnnotationTable {
    type Error = AnnotationParseError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        Self::parse(contents.as_bytes())
    }
}

fn lookup_icon<'a>(table: &'a HashMap<String, String>, id: Option<&str>) -> Option<&'a str> {
    table.get(id?).map(String::as_str)
}

fn tag(icon: Option<&String>, id: &str) -> String {
    match icon {
        Some(icon) => format!("[{icon} · {id}]"),
        None => format!("[{id}]"),
    }
}

/// Fenced block whose fence is longer than any backtick run inside `text`.
fn code_block(text: &str) -> String {
    let longest_run = text
        .split(|c| c != '`')
        .map(str::len)
        .max()
        .unwrap_or_default();
    let fence = "`".repeat(longest_run.max(2) + 1);
    format!("{fence}\n{text}\n{fence}")
}

#[derive(Debug, Snafu)]
pub enum AnnotationParseError {
    #[snafu(display("Failed to parse the sidecar document: {source}"))]
    ParseError { source: serde_json::Error },
}
