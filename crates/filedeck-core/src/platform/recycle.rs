/// Recycle-bin / trash facility.
///
/// Deleting always means "move to trash". When the host has no trash
/// facility the operation fails with `Unsupported`; it never falls back to a
/// permanent delete.
use crate::error::{FsError, FsResult, IoResultExt};
use std::fs;
use std::path::Path;
use tracing::debug;

/// The trash facility available to this process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trash {
    /// The platform recycle bin (Windows), Finder trash (macOS), or the
    /// freedesktop.org trash (other Unix desktops).
    System,
    /// No trash facility; every delete is refused.
    Unavailable,
}

impl Trash {
    /// Detect the facility compiled in for this target.
    pub fn detect() -> Self {
        if cfg!(any(
            windows,
            all(unix, not(target_os = "ios"), not(target_os = "android"))
        )) {
            Self::System
        } else {
            Self::Unavailable
        }
    }

    pub fn is_available(self) -> bool {
        matches!(self, Self::System)
    }

    /// Move `path` to the trash.
    pub fn delete(self, path: &Path) -> FsResult<()> {
        // Classify missing/inaccessible targets with the OS error kinds
        // before the trash backend turns them into opaque messages.
        fs::symlink_metadata(path).at(path)?;

        match self {
            Self::System => {
                system_delete(path)?;
                debug!("Moved {} to trash", path.display());
                Ok(())
            }
            Self::Unavailable => Err(FsError::unsupported(format!(
                "no trash facility to receive {}",
                path.display()
            ))),
        }
    }
}

#[cfg(any(windows, all(unix, not(target_os = "ios"), not(target_os = "android"))))]
fn system_delete(path: &Path) -> FsResult<()> {
    trash::delete(path).map_err(|err| FsError::other(path, err.to_string()))
}

#[cfg(not(any(windows, all(unix, not(target_os = "ios"), not(target_os = "android")))))]
fn system_delete(path: &Path) -> FsResult<()> {
    Err(FsError::unsupported(format!(
        "no trash facility to receive {}",
        path.display()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_unavailable_refuses_and_keeps_target() {
        let tmp = tempfile::TempDir::new().unwrap();
        let target = tmp.path().join("keep.txt");
        fs::write(&target, b"precious").unwrap();

        let err = Trash::Unavailable.delete(&target).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unsupported);
        assert_eq!(fs::read(&target).unwrap(), b"precious");
    }

    #[test]
    fn test_missing_target_is_not_found() {
        let tmp = tempfile::TempDir::new().unwrap();
        let err = Trash::Unavailable
            .delete(&tmp.path().join("ghost"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
