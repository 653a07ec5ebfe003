/// Path mutations — copy, recursive copy, trash-delete, rename, create.
///
/// Each operation is all-or-nothing for its single target. Callers must
/// re-list any directory snapshot they hold afterwards; nothing is pushed.
use crate::error::{FsError, FsResult, IoResultExt};
use crate::listing::absolute_normalized;
use crate::model::entry::display_name;
use crate::model::{EntryKind, PathProperties};
use crate::platform::Trash;
use crate::scanner::compute_size;
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, warn};

/// Copy a single file byte-for-byte, overwriting `dst`.
///
/// The modification time is carried over when the platform allows it; a
/// failure to set it does not fail the copy. Copying a file onto itself (or
/// onto a hard link of itself) is refused, since the copy would truncate it.
pub fn copy_file(src: &Path, dst: &Path) -> FsResult<u64> {
    let meta = fs::metadata(src).at(src)?;
    if meta.is_dir() {
        return Err(FsError::other(src, "is a directory"));
    }
    if let Ok(dst_meta) = fs::metadata(dst) {
        if same_file(src, &meta, dst, &dst_meta) {
            return Err(FsError::other(dst, "source and destination are the same file"));
        }
    }

    let bytes = fs::copy(src, dst).at(dst)?;
    if let Ok(modified) = meta.modified() {
        if let Err(err) = fs::File::options()
            .write(true)
            .open(dst)
            .and_then(|f| f.set_modified(modified))
        {
            debug!("Could not preserve mtime on {}: {err}", dst.display());
        }
    }

    debug!("Copied {} -> {} ({bytes} bytes)", src.display(), dst.display());
    Ok(bytes)
}

#[cfg(unix)]
fn same_file(_: &Path, a: &fs::Metadata, _: &Path, b: &fs::Metadata) -> bool {
    use std::os::unix::fs::MetadataExt;
    a.dev() == b.dev() && a.ino() == b.ino()
}

#[cfg(not(unix))]
fn same_file(a: &Path, _: &fs::Metadata, b: &Path, _: &fs::Metadata) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Totals reported by a finished tree copy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyStats {
    pub files: u64,
    pub dirs: u64,
    pub bytes: u64,
}

/// How a controlled tree copy ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    Completed(CopyStats),
    /// Cancellation was requested; the partial destination was removed.
    Cancelled,
}

/// Recursively copy the directory `src` to a new directory `dst`.
///
/// Fails with `AlreadyExists` if `dst` exists, leaving it untouched. Never
/// merges into an existing tree.
pub fn copy_tree(src: &Path, dst: &Path) -> FsResult<CopyStats> {
    let never = AtomicBool::new(false);
    match copy_tree_with(src, dst, &never, |_, _| {})? {
        CopyOutcome::Completed(stats) => Ok(stats),
        CopyOutcome::Cancelled => unreachable!("copy cancelled without a cancel request"),
    }
}

/// [`copy_tree`] with a cancellation flag and a per-file progress callback.
///
/// `dst` is created exclusively before anything is written, so on failure or
/// cancellation the whole destination can be removed again without touching
/// anything that existed before the call.
pub fn copy_tree_with<F>(
    src: &Path,
    dst: &Path,
    cancel: &AtomicBool,
    mut on_file: F,
) -> FsResult<CopyOutcome>
where
    F: FnMut(&Path, &CopyStats),
{
    let meta = fs::metadata(src).at(src)?;
    if !meta.is_dir() {
        return Err(FsError::other(src, "not a directory"));
    }
    if dst.starts_with(src) {
        return Err(FsError::other(dst, "cannot copy a directory into itself"));
    }

    if let Some(parent) = dst.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).at(parent)?;
    }
    // Exclusive create: fails with AlreadyExists instead of merging.
    fs::create_dir(dst).at(dst)?;

    let mut stats = CopyStats {
        dirs: 1,
        ..CopyStats::default()
    };

    let result = copy_children(src, dst, cancel, &mut stats, &mut on_file);
    match result {
        Ok(true) => {
            debug!(
                "Copied tree {} -> {} ({} files, {} bytes)",
                src.display(),
                dst.display(),
                stats.files,
                stats.bytes
            );
            Ok(CopyOutcome::Completed(stats))
        }
        Ok(false) => {
            roll_back(dst);
            Ok(CopyOutcome::Cancelled)
        }
        Err(err) => {
            roll_back(dst);
            Err(err)
        }
    }
}

/// Walk `src` in depth-first order, recreating it under `dst`.
///
/// Returns `Ok(false)` if cancelled.
fn copy_children<F>(
    src: &Path,
    dst: &Path,
    cancel: &AtomicBool,
    stats: &mut CopyStats,
    on_file: &mut F,
) -> FsResult<bool>
where
    F: FnMut(&Path, &CopyStats),
{
    // Serial + sorted: parents are always yielded before their children.
    let walker = jwalk::WalkDir::new(src)
        .skip_hidden(false)
        .follow_links(false)
        .sort(true)
        .min_depth(1)
        .parallelism(jwalk::Parallelism::Serial);

    for entry_result in walker {
        if cancel.load(Ordering::Relaxed) {
            return Ok(false);
        }

        let entry = entry_result.map_err(|err| walk_error(err, src))?;
        let path = entry.path();
        let relative = path
            .strip_prefix(src)
            .map_err(|_| FsError::other(&path, "entry outside copy root"))?;
        let target = dst.join(relative);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            fs::create_dir(&target).at(&target)?;
            stats.dirs += 1;
        } else if file_type.is_symlink() {
            copy_symlink(&path, &target)?;
            stats.files += 1;
        } else {
            stats.bytes += copy_file(&path, &target)?;
            stats.files += 1;
            on_file(&path, stats);
        }
    }

    Ok(true)
}

/// Links are recreated as links, so a copied tree never grows through a
/// link cycle.
#[cfg(unix)]
fn copy_symlink(src: &Path, dst: &Path) -> FsResult<()> {
    let target = fs::read_link(src).at(src)?;
    std::os::unix::fs::symlink(&target, dst).at(dst)
}

/// Without portable link creation, file links are copied by content and
/// directory links are skipped.
#[cfg(not(unix))]
fn copy_symlink(src: &Path, dst: &Path) -> FsResult<()> {
    match fs::metadata(src) {
        Ok(meta) if meta.is_file() => copy_file(src, dst).map(|_| ()),
        _ => {
            warn!("Skipping directory link {}", src.display());
            Ok(())
        }
    }
}

fn walk_error(err: jwalk::Error, root: &Path) -> FsError {
    let path = err.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
    let message = err.to_string();
    match err.into_io_error() {
        Some(io) => FsError::from_io(io, &path),
        // Only filesystem loops carry no io error.
        None => FsError::other(&path, message),
    }
}

fn roll_back(dst: &Path) {
    if let Err(err) = fs::remove_dir_all(dst) {
        warn!("Could not remove partial copy {}: {err}", dst.display());
    }
}

/// Move `path` to the platform trash.
///
/// Fails with `Unsupported` where no trash facility exists; never deletes
/// permanently.
pub fn delete_path(path: &Path) -> FsResult<()> {
    Trash::detect().delete(path)
}

/// Rename or move `old_path` to `new_path`.
///
/// Refuses to overwrite: if `new_path` already exists the call fails with
/// `AlreadyExists` and neither path is touched.
pub fn rename_path(old_path: &Path, new_path: &Path) -> FsResult<()> {
    fs::symlink_metadata(old_path).at(old_path)?;
    if fs::symlink_metadata(new_path).is_ok() {
        return Err(FsError::already_exists(new_path));
    }
    fs::rename(old_path, new_path).at(new_path)?;
    debug!("Renamed {} -> {}", old_path.display(), new_path.display());
    Ok(())
}

/// Rename `path` to `new_name` within its parent directory.
pub fn rename_in_place(path: &Path, new_name: &str) -> FsResult<PathBuf> {
    if new_name.is_empty() || new_name.contains(['/', '\\']) {
        return Err(FsError::other(path, format!("invalid name {new_name:?}")));
    }
    let parent = path
        .parent()
        .ok_or_else(|| FsError::other(path, "has no parent directory"))?;
    let new_path = parent.join(new_name);
    rename_path(path, &new_path)?;
    Ok(new_path)
}

/// Create `path` and any missing parents. Succeeds if it already exists as a
/// directory.
pub fn create_directory(path: &Path) -> FsResult<()> {
    fs::create_dir_all(path).at(path)?;
    debug!("Created directory {}", path.display());
    Ok(())
}

/// Paste `source` into `dest_dir` under its own file name.
///
/// Directories go through [`copy_tree`]; files through [`copy_file`], which
/// overwrites an existing file of the same name.
pub fn paste_into(source: &Path, dest_dir: &Path) -> FsResult<PathBuf> {
    let name = source
        .file_name()
        .ok_or_else(|| FsError::other(source, "has no file name"))?;
    let dst = dest_dir.join(name);

    if fs::metadata(source).at(source)?.is_dir() {
        copy_tree(source, &dst)?;
    } else {
        copy_file(source, &dst)?;
    }
    Ok(dst)
}

/// Gather name, kind, recursive size, location, and mtime for `path`.
pub fn path_properties(path: &Path) -> FsResult<PathProperties> {
    let meta = fs::metadata(path).at(path)?;
    let absolute_location = absolute_normalized(path).at(path)?;
    let kind = if meta.is_dir() {
        EntryKind::Directory
    } else {
        EntryKind::File
    };

    Ok(PathProperties {
        name: display_name(&absolute_location),
        kind,
        total_size_bytes: compute_size(path),
        absolute_location,
        last_modified: meta.modified().ok().map(DateTime::<Local>::from),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_copy_file_overwrites() {
        let tmp = tempfile::TempDir::new().unwrap();
        let src = tmp.path().join("src.txt");
        let dst = tmp.path().join("dst.txt");
        fs::write(&src, b"new contents").unwrap();
        fs::write(&dst, b"old").unwrap();

        assert_eq!(copy_file(&src, &dst).unwrap(), 12);
        assert_eq!(fs::read(&dst).unwrap(), b"new contents");
    }

    #[test]
    fn test_copy_file_preserves_mtime() {
        let tmp = tempfile::TempDir::new().unwrap();
        let src = tmp.path().join("src.txt");
        let dst = tmp.path().join("dst.txt");
        fs::write(&src, b"x").unwrap();
        let past = std::time::SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(1_000_000_000);
        fs::File::options()
            .write(true)
            .open(&src)
            .unwrap()
            .set_modified(past)
            .unwrap();

        copy_file(&src, &dst).unwrap();
        assert_eq!(fs::metadata(&dst).unwrap().modified().unwrap(), past);
    }

    #[test]
    fn test_copy_file_onto_itself_keeps_contents() {
        let tmp = tempfile::TempDir::new().unwrap();
        let file = tmp.path().join("report.txt");
        fs::write(&file, b"precious contents").unwrap();

        let err = copy_file(&file, &file).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Other);
        assert_eq!(fs::read(&file).unwrap(), b"precious contents");
    }

    #[cfg(unix)]
    #[test]
    fn test_copy_file_onto_hard_link_keeps_contents() {
        let tmp = tempfile::TempDir::new().unwrap();
        let file = tmp.path().join("a.txt");
        let link = tmp.path().join("b.txt");
        fs::write(&file, b"shared").unwrap();
        fs::hard_link(&file, &link).unwrap();

        assert!(copy_file(&file, &link).is_err());
        assert_eq!(fs::read(&file).unwrap(), b"shared");
    }

    #[test]
    fn test_copy_file_missing_source() {
        let tmp = tempfile::TempDir::new().unwrap();
        let err = copy_file(&tmp.path().join("nope"), &tmp.path().join("dst")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_rename_in_place_rejects_separators() {
        let tmp = tempfile::TempDir::new().unwrap();
        let file = tmp.path().join("a.txt");
        fs::write(&file, b"").unwrap();
        let err = rename_in_place(&file, "../escape.txt").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Other);
        assert!(file.exists());
    }

    #[test]
    fn test_rename_in_place_stays_in_parent() {
        let tmp = tempfile::TempDir::new().unwrap();
        let file = tmp.path().join("a.txt");
        fs::write(&file, b"").unwrap();
        let new_path = rename_in_place(&file, "b.txt").unwrap();
        assert_eq!(new_path, tmp.path().join("b.txt"));
        assert!(new_path.exists());
        assert!(!file.exists());
    }

    #[test]
    fn test_create_directory_is_idempotent() {
        let tmp = tempfile::TempDir::new().unwrap();
        let deep = tmp.path().join("a/b/c");
        create_directory(&deep).unwrap();
        create_directory(&deep).unwrap();
        assert!(deep.is_dir());
    }

    #[test]
    fn test_create_directory_over_file_fails() {
        let tmp = tempfile::TempDir::new().unwrap();
        let file = tmp.path().join("f");
        fs::write(&file, b"").unwrap();
        assert!(create_directory(&file).is_err());
    }

    #[test]
    fn test_copy_tree_into_itself_is_refused() {
        let tmp = tempfile::TempDir::new().unwrap();
        let src = tmp.path().join("src");
        fs::create_dir(&src).unwrap();
        let err = copy_tree(&src, &src.join("inner")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Other);
        assert!(!src.join("inner").exists());
    }

    #[test]
    fn test_cancelled_copy_removes_partial_tree() {
        let tmp = tempfile::TempDir::new().unwrap();
        let src = tmp.path().join("src");
        fs::create_dir(&src).unwrap();
        for i in 0..5 {
            fs::write(src.join(format!("f{i}")), b"data").unwrap();
        }
        let dst = tmp.path().join("dst");
        let cancel = AtomicBool::new(false);

        let outcome = copy_tree_with(&src, &dst, &cancel, |_, _| {
            cancel.store(true, Ordering::Relaxed);
        })
        .unwrap();

        assert_eq!(outcome, CopyOutcome::Cancelled);
        assert!(!dst.exists());
        assert_eq!(fs::read_dir(&src).unwrap().count(), 5);
    }

    #[test]
    fn test_path_properties_of_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let file = tmp.path().join("notes.md");
        fs::write(&file, vec![0u8; 321]).unwrap();

        let props = path_properties(&file).unwrap();
        assert_eq!(props.name, "notes.md");
        assert_eq!(props.kind, EntryKind::File);
        assert_eq!(props.total_size_bytes, 321);
        assert_eq!(props.absolute_location, file);
        assert!(props.last_modified.is_some());
    }
}
