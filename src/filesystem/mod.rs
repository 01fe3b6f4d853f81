//! Filesystem access layer.
//!
//! Uniform async file operations over the OS, with every OS error funnelled
//! through one normalization table into [`FsError`].

mod access;
mod cancellation;
mod error;
mod names;
mod stat;

pub use access::{DeleteOptions, FileAccess, RenameOptions, WriteOptions};
pub use cancellation::{CancellationExt, CancellationToken};
pub use error::FsError;
pub use names::{normalize_os_name, to_composed};
pub use stat::{EntryKind, Stat};
