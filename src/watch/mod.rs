//! Change notification: OS watch callbacks classified into created, changed and
//! deleted events.

mod subscription;
mod translator;

pub use subscription::{WatchError, WatchHandle, WatchOptions, WatchSubscription, watch};
pub use translator::{ChangeEvent, ChangeKind, ChangeTranslator, RawEventKind, RawWatchEvent};
