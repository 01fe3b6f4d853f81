//! Lazy tree over a directory hierarchy.
//!
//! Children are listed and ordered on every expansion; hidden entries are only
//! dropped when display items are produced.

mod builder;
mod entry;
mod item;
mod ordering;

pub use builder::TreeBuilder;
pub use entry::Entry;
pub use item::{Collapsible, OPEN_FILE_COMMAND, OpenCommand, TreeItem, display_items, is_hidden_name};
pub use ordering::{compare_entries, locale_cmp, sort_entries};
