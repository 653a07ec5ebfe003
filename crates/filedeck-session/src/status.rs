/// Messages the frontend should surface to the user.
use chrono::{DateTime, Local};
use filedeck_core::{ErrorKind, FsError};

/// Severity of a [`StatusMessage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    /// Expected refusals, such as access denied.
    Warning,
    Error,
}

/// One message, ready to render as a toast or dialog.
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub level: StatusLevel,
    pub title: String,
    pub text: String,
    pub at: DateTime<Local>,
}

impl StatusMessage {
    pub fn info(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(StatusLevel::Info, title, text)
    }

    /// Map a core error to a message. Access-denied is a warning with its own
    /// title so frontends can show it differently from real failures.
    pub fn from_error(err: &FsError) -> Self {
        match err.kind() {
            ErrorKind::PermissionDenied => {
                Self::new(StatusLevel::Warning, "Access denied", err.to_string())
            }
            kind => Self::new(StatusLevel::Error, kind.label(), err.to_string()),
        }
    }

    fn new(level: StatusLevel, title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            text: text.into(),
            at: Local::now(),
        }
    }
}
