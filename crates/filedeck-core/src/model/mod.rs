/// Data model for FileDeck listings and properties.
///
/// Re-exports the snapshot types and the size formatting helpers.
pub mod entry;
pub mod size;

pub use entry::{DirectoryEntry, EntryKind, PathProperties, Volume};
pub use size::{format_count, format_size};
