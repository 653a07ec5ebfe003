/// Listing snapshots and on-demand properties.
///
/// Entries are produced fresh by every listing call and never mutated
/// afterwards. Names are stored as `CompactString` because almost every
/// file name fits inline, which keeps a large listing to one allocation.
use chrono::{DateTime, Local};
use compact_str::CompactString;
use serde::{Serialize, Serializer};
use std::path::{Path, PathBuf};

/// Whether a path is a directory or anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EntryKind {
    File,
    Directory,
}

impl EntryKind {
    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::File => "File",
            Self::Directory => "Directory",
        }
    }

    #[inline]
    pub fn is_dir(self) -> bool {
        matches!(self, Self::Directory)
    }
}

/// One immediate child of a listed directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryEntry {
    /// Display name only (NOT the full path).
    pub name: CompactString,
    /// Absolute path: the listed directory joined with the name the OS
    /// reported for this child. Exported lossily, so a non-UTF-8 name never
    /// aborts an export.
    #[serde(serialize_with = "serialize_path_lossy")]
    pub full_path: PathBuf,
    pub kind: EntryKind,
}

fn serialize_path_lossy<P, S>(path: &P, serializer: S) -> Result<S::Ok, S::Error>
where
    P: AsRef<Path>,
    S: Serializer,
{
    serializer.serialize_str(&path.as_ref().to_string_lossy())
}

impl DirectoryEntry {
    #[inline]
    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }
}

/// Properties of a single file or directory, computed on demand.
#[derive(Debug, Clone, Serialize)]
pub struct PathProperties {
    pub name: CompactString,
    pub kind: EntryKind,
    /// Byte length for files; recursive total for directories.
    pub total_size_bytes: u64,
    /// Absolute, lexically normalised location.
    #[serde(serialize_with = "serialize_path_lossy")]
    pub absolute_location: PathBuf,
    pub last_modified: Option<DateTime<Local>>,
}

/// A navigable storage root: a drive such as `C:\` or a mount point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Volume {
    pub path: PathBuf,
}

impl Volume {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Label shown in a drive picker.
    pub fn label(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

/// Display name for a path: its last component, or the whole path for roots.
pub(crate) fn display_name(path: &Path) -> CompactString {
    match path.file_name() {
        Some(name) => CompactString::new(name.to_string_lossy()),
        None => CompactString::new(path.to_string_lossy()),
    }
}
