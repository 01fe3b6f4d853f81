use std::path::PathBuf;

use futures::future::join_all;
use tracing::debug;

use crate::{
    ext::PathDisplayExt,
    filesystem::{CancellationExt, CancellationToken, FileAccess, FsError},
};

use super::{Entry, ordering::sort_entries};

/// Lazily expands directory nodes. Nothing is cached between expansions.
#[derive(Debug, Clone, Default)]
pub struct TreeBuilder {
    fs: FileAccess,
    root: Option<PathBuf>,
}

impl TreeBuilder {
    pub fn new(fs: FileAccess, root: Option<PathBuf>) -> Self {
        Self { fs, root }
    }

    pub fn root(&self) -> Option<&PathBuf> {
        self.root.as_ref()
    }

    /// Ordered children of `node`, or of the workspace root when `node` is `None`.
    ///
    /// Hidden names are included; they are filtered when display items are built.
    pub async fn get_children(&self, node: Option<&Entry>) -> Result<Vec<Entry>, FsError> {
        self.get_children_with(node, &CancellationToken::new()).await
    }

    pub async fn get_children_with(
        &self,
        node: Option<&Entry>,
        cancellation: &CancellationToken,
    ) -> Result<Vec<Entry>, FsError> {
        let directory = match (node, &self.root) {
            (Some(entry), _) => entry.path().to_path_buf(),
            (None, Some(root)) => root.clone(),
            (None, None) => return Ok(Vec::new()),
        };

        cancellation.ensure_active()?;
        let names = self.fs.list_directory(&directory).await?;

        cancellation.ensure_active()?;
        let stats = join_all(names.into_iter().map(|name| {
            let path = directory.join(name);
            async move {
                let stat = self.fs.stat(&path).await;
                (path, stat)
            }
        }))
        .await;

        let mut children: Vec<Entry> = stats
            .into_iter()
            .filter_map(|(path, stat)| match stat {
                Ok(stat) => Some(Entry::new(path, stat.kind)),
                Err(error) => {
                    debug!(
                        "Dropping {} from listing: {}",
                        path.lexical_display(),
                        error
                    );
                    None
                }
            })
            .collect();

        sort_entries(&mut children);
        Ok(children)
    }
}
