use colored::Colorize;

use crate::{
    config::AnnotationSnapshot,
    filesystem::{EntryKind, FileAccess, FsError},
    tree::{Collapsible, Entry, TreeBuilder, TreeItem, display_items},
};

/// Text rendering of the visible tree, expanded depth first.
///
/// Directories reached through a symbolic link are listed but never expanded, so
/// links back to an ancestor cannot recurse.
pub struct TreeView<'a> {
    builder: &'a TreeBuilder,
    fs: FileAccess,
    annotations: AnnotationSnapshot,
    max_depth: Option<usize>,
    colors: bool,
}

impl<'a> TreeView<'a> {
    pub fn new(builder: &'a TreeBuilder, annotations: AnnotationSnapshot) -> Self {
        Self {
            builder,
            fs: FileAccess::new(),
            annotations,
            max_depth: None,
            colors: false,
        }
    }

    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_colors(mut self, colors: bool) -> Self {
        self.colors = colors;
        self
    }

    pub async fn render(&self) -> Result<Vec<String>, FsError> {
        let mut lines = Vec::new();
        let roots = self.builder.get_children(None).await?;
        let mut pending: Vec<(TreeItem, usize)> = display_items(&roots, &self.annotations)
            .into_iter()
            .rev()
            .map(|item| (item, 1))
            .collect();

        while let Some((item, depth)) = pending.pop() {
            lines.push(self.format_line(&item, depth));

            let expandable = item.collapsible == Collapsible::Collapsed
                && self.max_depth.is_none_or(|max| depth < max);
            if !expandable || self.fs.is_symbolic_link(&item.path).await {
                continue;
            }

            let node = Entry::new(item.path, EntryKind::Directory);
            let children = self.builder.get_children(Some(&node)).await?;
            pending.extend(
                display_items(&children, &self.annotations)
                    .into_iter()
                    .rev()
                    .map(|child| (child, depth + 1)),
            );
        }

        Ok(lines)
    }

    fn format_line(&self, item: &TreeItem, depth: usize) -> String {
        let indent = "  ".repeat(depth - 1);
        let label = match (item.collapsible, self.colors) {
            (Collapsible::Collapsed, true) => format!("{}/", item.label).blue().bold().to_string(),
            (Collapsible::Collapsed, false) => format!("{}/", item.label),
            (Collapsible::None, _) => item.label.clone(),
        };

        match &item.description {
            Some(description) if self.colors => {
                format!("{indent}{label}  {}", description.dimmed())
            }
            Some(description) => format!("{indent}{label}  {description}"),
            None => format!("{indent}{label}"),
        }
    }
}
