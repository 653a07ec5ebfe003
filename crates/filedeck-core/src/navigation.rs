/// Navigation — the current directory and "go to parent".
///
/// The parent computation is pure; moving to it is an explicit assignment by
/// whoever owns the [`NavigationState`], after a successful listing.
use std::path::{Path, PathBuf};

/// Parent of `current`, ignoring trailing separators.
///
/// `None` when there is no parent (a root) or when the parent would equal
/// `current`, so repeated "back" at a root cannot loop.
pub fn go_to_parent(current: &Path) -> Option<PathBuf> {
    // Component-based: trailing separators are dropped and non-UTF-8 names
    // pass through unchanged.
    let parent = current.parent()?;

    if parent.as_os_str().is_empty() || parent == current {
        return None;
    }
    Some(parent.to_path_buf())
}

/// The directory a session is looking at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationState {
    current: Option<PathBuf>,
}

impl NavigationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&Path> {
        self.current.as_deref()
    }

    /// Record a directory that was just listed successfully.
    pub fn set_current(&mut self, path: PathBuf) {
        self.current = Some(path);
    }

    /// Parent of the current directory, without moving there.
    pub fn parent(&self) -> Option<PathBuf> {
        self.current.as_deref().and_then(go_to_parent)
    }
}
