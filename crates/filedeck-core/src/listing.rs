/// Directory listing — one snapshot of a directory's immediate children.
///
/// Every entry's `full_path` is the listed directory joined with a name the
/// OS returned from `read_dir`; paths are never synthesised.
use crate::error::{FsResult, IoResultExt};
use crate::model::{DirectoryEntry, EntryKind};
use compact_str::CompactString;
use std::cmp::Ordering;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Order applied to a listing snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListingOrder {
    /// Whatever order the OS returned. Filesystem-dependent.
    Native,
    /// Directories first, then files; each group by case-insensitive name,
    /// ties broken by the exact name.
    #[default]
    DirectoriesFirst,
}

/// Options for [`list_directory_with`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ListOptions {
    pub order: ListingOrder,
}

/// List `path` with the default options.
pub fn list_directory(path: &Path) -> FsResult<Vec<DirectoryEntry>> {
    list_directory_with(path, ListOptions::default())
}

/// List the immediate children of `path`.
///
/// A child is a `Directory` when `stat` (following links) says so, and a
/// `File` otherwise, including dangling links. A failure on any child fails
/// the whole listing.
pub fn list_directory_with(path: &Path, options: ListOptions) -> FsResult<Vec<DirectoryEntry>> {
    let dir = absolute_normalized(path).at(path)?;
    let reader = fs::read_dir(&dir).at(&dir)?;

    let mut entries = Vec::new();
    for entry in reader {
        let entry = entry.at(&dir)?;
        let name = entry.file_name();
        let full_path = dir.join(&name);

        let is_dir = match fs::metadata(&full_path) {
            Ok(meta) => meta.is_dir(),
            Err(_) => entry.file_type().map(|t| t.is_dir()).unwrap_or(false),
        };

        entries.push(DirectoryEntry {
            name: CompactString::new(name.to_string_lossy()),
            full_path,
            kind: if is_dir {
                EntryKind::Directory
            } else {
                EntryKind::File
            },
        });
    }

    if options.order == ListingOrder::DirectoriesFirst {
        entries.sort_by(directories_first);
    }

    debug!("Listed {} entries in {}", entries.len(), dir.display());
    Ok(entries)
}

/// Absolute form of `path` with `.` and `..` resolved lexically.
///
/// `..` drops the previous component without consulting the filesystem, so
/// `link/..` names the directory holding `link`. `..` at a root stays there.
pub(crate) fn absolute_normalized(path: &Path) -> io::Result<PathBuf> {
    let absolute = std::path::absolute(path)?;
    let mut out = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    Ok(out)
}

fn directories_first(a: &DirectoryEntry, b: &DirectoryEntry) -> Ordering {
    b.is_dir()
        .cmp(&a.is_dir())
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.name.cmp(&b.name))
}
