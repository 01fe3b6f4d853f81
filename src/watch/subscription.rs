use std::{
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

use futures::StreamExt;
use futures_channel::mpsc::{UnboundedReceiver, unbounded};
use globset::{Glob, GlobSet, GlobSetBuilder};
use notify::{
    Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher,
    event::{ModifyKind, RenameMode},
};
use parking_lot::Mutex;
use snafu::{ResultExt, Snafu};
use tracing::{debug, warn};

use crate::{ext::PathDisplayExt, filesystem::FileAccess};

use super::translator::{ChangeEvent, ChangeTranslator, RawEventKind, RawWatchEvent};

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum WatchError {
    #[snafu(display("Invalid exclude pattern '{pattern}': {source}"))]
    InvalidExcludeError {
        pattern: String,
        source: globset::Error,
    },
    #[snafu(display("Failed to watch {path}: {source}"))]
    BackendError { path: String, source: notify::Error },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchOptions {
    pub recursive: bool,
    /// Globs matched against paths relative to the watched root.
    pub excludes: Vec<String>,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            recursive: true,
            excludes: Vec::new(),
        }
    }
}

/// Releases the OS watch when cancelled. Clones share the same watch.
#[derive(Clone)]
pub struct WatchHandle {
    watcher: Arc<Mutex<Option<RecommendedWatcher>>>,
}

impl WatchHandle {
    fn new(watcher: RecommendedWatcher) -> Self {
        Self {
            watcher: Arc::new(Mutex::new(Some(watcher))),
        }
    }

    /// Stops delivery. Calling it again is a no-op.
    pub fn cancel(&self) {
        if self.watcher.lock().take().is_some() {
            debug!("Released file watch");
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.watcher.lock().is_none()
    }
}

impl fmt::Debug for WatchHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchHandle")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

/// Classified change events for one watched root.
pub struct WatchSubscription {
    translator: ChangeTranslator,
    receiver: UnboundedReceiver<RawWatchEvent>,
    handle: WatchHandle,
}

impl WatchSubscription {
    /// Next classified event, or `None` once the subscription is cancelled.
    pub async fn next_event(&mut self) -> Option<ChangeEvent> {
        if self.handle.is_cancelled() {
            return None;
        }

        let raw = self.receiver.next().await?;
        if self.handle.is_cancelled() {
            return None;
        }

        Some(self.translator.translate(raw).await)
    }

    pub fn cancel(&mut self) {
        self.handle.cancel();
        self.receiver.close();
    }

    pub fn handle(&self) -> WatchHandle {
        self.handle.clone()
    }

    pub fn root(&self) -> &Path {
        self.translator.root()
    }
}

impl Drop for WatchSubscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Subscribes to changes below `root`.
pub fn watch(root: &Path, options: &WatchOptions) -> Result<WatchSubscription, WatchError> {
    let root = std::path::absolute(root).unwrap_or_else(|_| root.to_path_buf());
    let filter = EventFilter::new(&root, &options.excludes)?;
    let (sender, receiver) = unbounded();

    let mut watcher = notify::recommended_watcher(move |result: notify::Result<Event>| {
        match result {
            Ok(event) => {
                for raw in filter.raw_events(&event) {
                    // The receiver is gone once the subscription is cancelled.
                    if sender.unbounded_send(raw).is_err() {
                        return;
                    }
                }
            }
            Err(error) => warn!("File watcher error: {}", error),
        }
    })
    .context(BackendSnafu {
        path: root.lexical_display(),
    })?;

    let mode = if options.recursive {
        RecursiveMode::Recursive
    } else {
        RecursiveMode::NonRecursive
    };
    watcher.watch(&root, mode).context(BackendSnafu {
        path: root.lexical_display(),
    })?;

    debug!(
        "Watching {} (recursive: {}, excludes: {:?})",
        root.lexical_display(),
        options.recursive,
        options.excludes
    );

    Ok(WatchSubscription {
        translator: ChangeTranslator::new(root, FileAccess::new()),
        receiver,
        handle: WatchHandle::new(watcher),
    })
}

/// Folds backend event kinds into the two raw callback kinds.
///
/// A rename reported with both paths repeats the separate `From` and `To` events
/// of the same backend, so only the per-path halves are kept.
fn raw_kind(kind: &EventKind) -> Option<RawEventKind> {
    match kind {
        EventKind::Access(_) | EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => None,
        EventKind::Modify(ModifyKind::Data(_) | ModifyKind::Metadata(_) | ModifyKind::Any) => {
            Some(RawEventKind::Change)
        }
        _ => Some(RawEventKind::Rename),
    }
}

struct EventFilter {
    /// The watched root and, when it differs, its canonical form; some backends
    /// report canonical paths.
    roots: Vec<PathBuf>,
    excludes: GlobSet,
}

impl EventFilter {
    fn new(root: &Path, patterns: &[String]) -> Result<Self, WatchError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            builder.add(Glob::new(pattern).context(InvalidExcludeSnafu {
                pattern: pattern.as_str(),
            })?);
        }
        let excludes = builder.build().context(InvalidExcludeSnafu {
            pattern: patterns.join(", "),
        })?;

        let mut roots = vec![root.to_path_buf()];
        match std::fs::canonicalize(root) {
            Ok(canonical) if canonical != root => roots.push(canonical),
            _ => {}
        }

        Ok(Self { roots, excludes })
    }

    fn relative(&self, path: &Path) -> PathBuf {
        self.roots
            .iter()
            .find_map(|root| path.strip_prefix(root).ok())
            .unwrap_or(path)
            .to_path_buf()
    }

    fn raw_events(&self, event: &Event) -> Vec<RawWatchEvent> {
        let Some(kind) = raw_kind(&event.kind) else {
            return Vec::new();
        };

        event
            .paths
            .iter()
            .map(|path| self.relative(path))
            .filter(|name| !name.as_os_str().is_empty() && !self.excludes.is_match(name))
            .map(|name| RawWatchEvent { kind, name })
            .collect()
    }
}
