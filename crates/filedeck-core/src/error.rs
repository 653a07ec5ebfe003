/// Failure taxonomy for every filesystem call the core makes.
///
/// OS errors are classified once, at the call site, through
/// [`FsError::from_io`]. Nothing leaves the core as a raw `io::Error`.
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Convenience alias used by every fallible core operation.
pub type FsResult<T> = Result<T, FsError>;

/// Plain classification of an [`FsError`], for callers that only need to
/// branch on the category (e.g. "show an access-denied warning").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    PermissionDenied,
    NotFound,
    AlreadyExists,
    Unsupported,
    Other,
}

impl ErrorKind {
    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::PermissionDenied => "Permission denied",
            Self::NotFound => "Not found",
            Self::AlreadyExists => "Already exists",
            Self::Unsupported => "Unsupported",
            Self::Other => "Error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A classified filesystem failure, carrying the path it concerns.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FsError {
    #[error("permission denied: {}", path.display())]
    PermissionDenied { path: PathBuf },

    #[error("no such file or directory: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("already exists: {}", path.display())]
    AlreadyExists { path: PathBuf },

    #[error("unsupported on this platform: {what}")]
    Unsupported { what: String },

    #[error("{}: {message}", path.display())]
    Other { path: PathBuf, message: String },
}

impl FsError {
    /// Classify an OS error raised while operating on `path`.
    pub fn from_io(err: io::Error, path: &Path) -> Self {
        let path = path.to_path_buf();
        match err.kind() {
            io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            io::ErrorKind::NotFound => Self::NotFound { path },
            io::ErrorKind::AlreadyExists => Self::AlreadyExists { path },
            io::ErrorKind::Unsupported => Self::Unsupported {
                what: format!("{err} ({})", path.display()),
            },
            _ => Self::Other {
                path,
                message: err.to_string(),
            },
        }
    }

    pub fn already_exists(path: &Path) -> Self {
        Self::AlreadyExists {
            path: path.to_path_buf(),
        }
    }

    pub fn unsupported(what: impl Into<String>) -> Self {
        Self::Unsupported { what: what.into() }
    }

    pub fn other(path: &Path, message: impl Into<String>) -> Self {
        Self::Other {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    /// The category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::PermissionDenied { .. } => ErrorKind::PermissionDenied,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            Self::Unsupported { .. } => ErrorKind::Unsupported,
            Self::Other { .. } => ErrorKind::Other,
        }
    }
}

/// Extension for attaching a path to a raw `io::Result`.
pub(crate) trait IoResultExt<T> {
    fn at(self, path: &Path) -> FsResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn at(self, path: &Path) -> FsResult<T> {
        self.map_err(|err| FsError::from_io(err, path))
    }
}
