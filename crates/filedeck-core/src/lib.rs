/// FileDeck Core — the file-operations and directory-traversal engine.
///
/// This crate contains all filesystem logic with zero UI dependencies.
/// Every function is stateless over its inputs; the current directory and
/// clipboard belong to whichever frontend drives it.
///
/// # Modules
///
/// - [`model`] — Listing entries, properties, volumes, and size formatting.
/// - [`listing`] — Immediate-children snapshots of a directory.
/// - [`ops`] — Copy, tree copy, trash-delete, rename, and create.
/// - [`scanner`] — Recursive size aggregation.
/// - [`jobs`] — Background size and copy jobs with progress and cancellation.
/// - [`navigation`] — Current directory and parent computation.
/// - [`platform`] — Volume enumeration, trash facility, default opener.
/// - [`export`] — JSON and CSV listing export.
/// - [`error`] — The classified error type shared by all of the above.
pub mod error;
pub mod export;
pub mod jobs;
pub mod listing;
pub mod model;
pub mod navigation;
pub mod ops;
pub mod platform;
pub mod scanner;

pub use error::{ErrorKind, FsError, FsResult};
pub use listing::{list_directory, list_directory_with, ListOptions, ListingOrder};
pub use model::{format_size, DirectoryEntry, EntryKind, PathProperties, Volume};
pub use navigation::{go_to_parent, NavigationState};
pub use ops::{
    copy_file, copy_tree, create_directory, delete_path, path_properties, paste_into,
    rename_in_place, rename_path,
};
pub use platform::list_volumes;
pub use scanner::compute_size;
