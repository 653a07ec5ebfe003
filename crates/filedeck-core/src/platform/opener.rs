/// Hand a file to the desktop's default application.
///
/// The opener is found by probing `PATH` for a known launcher command, so the
/// choice follows what is installed rather than the OS name.
use crate::error::{FsError, FsResult, IoResultExt};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;

/// Launcher commands in probe order, with the arguments placed before the path.
const LAUNCHERS: &[(&str, &[&str])] = &[
    ("xdg-open", &[]),
    ("open", &[]),
    // `start` treats the first quoted argument as a window title.
    ("cmd", &["/C", "start", ""]),
];

/// A launcher found on this host.
#[derive(Debug, Clone)]
pub struct Opener {
    program: PathBuf,
    args: &'static [&'static str],
}

impl Opener {
    /// Find the first available launcher.
    pub fn detect() -> Option<Self> {
        LAUNCHERS.iter().find_map(|&(name, args)| {
            which::which(name).ok().map(|program| Self { program, args })
        })
    }

    /// Spawn the launcher for `path` without waiting for it.
    pub fn open(&self, path: &Path) -> FsResult<()> {
        Command::new(&self.program)
            .args(self.args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .at(path)?;
        debug!("Opened {} with {}", path.display(), self.program.display());
        Ok(())
    }
}

/// Open `path` with the default application.
pub fn open_with_default_app(path: &Path) -> FsResult<()> {
    std::fs::symlink_metadata(path).at(path)?;
    match Opener::detect() {
        Some(opener) => opener.open(path),
        None => Err(FsError::unsupported("no default-application launcher found")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_missing_path_is_not_found() {
        let err = open_with_default_app(Path::new("/definitely/not/here.txt")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
