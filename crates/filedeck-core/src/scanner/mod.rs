/// Size aggregation — byte totals for files and whole directory trees.
///
/// Directory totals come from a `jwalk` traversal that sums the length of
/// every regular file beneath the root. Unreadable subdirectories are skipped
/// (they contribute 0) instead of aborting the walk, so one locked folder
/// still leaves an approximate total. The walk is not a snapshot: concurrent
/// changes can make the result approximate.
pub mod progress;

use crate::model::DirectoryEntry;
use rayon::prelude::*;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, warn};

/// Running totals of a size walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SizeTally {
    /// Sum of regular-file lengths.
    pub bytes: u64,
    /// Regular files counted.
    pub files: u64,
    /// Directories or files that could not be read and were skipped.
    pub skipped: u64,
    /// `true` if the walk stopped early on a cancellation request.
    pub cancelled: bool,
}

/// How a size walk schedules its directory reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkMode {
    /// Read directories on a dedicated rayon pool sized to the CPU count.
    Parallel,
    /// Read directories on the calling thread. Use inside rayon tasks.
    Serial,
}

impl WalkMode {
    fn parallelism(self) -> jwalk::Parallelism {
        match self {
            Self::Parallel => jwalk::Parallelism::RayonNewPool(num_cpus::get()),
            Self::Serial => jwalk::Parallelism::Serial,
        }
    }
}

/// Number of counted files between progress callbacks.
const PROGRESS_INTERVAL: u64 = 1_000;

/// Total byte size of `path`.
///
/// A file returns its length. A directory returns the sum over every regular
/// file beneath it. A path that cannot be read at all returns 0.
pub fn compute_size(path: &Path) -> u64 {
    let never = AtomicBool::new(false);
    walk_size(path, WalkMode::Parallel, &never, |_, _| {}).bytes
}

/// [`compute_size`] with cancellation and periodic progress.
///
/// `on_progress` runs every [`PROGRESS_INTERVAL`] files with the running
/// tally and the path just counted.
pub fn walk_size<F>(path: &Path, mode: WalkMode, cancel: &AtomicBool, mut on_progress: F) -> SizeTally
where
    F: FnMut(&SizeTally, &Path),
{
    let mut tally = SizeTally::default();

    let meta = match fs::metadata(path) {
        Ok(m) => m,
        Err(err) => {
            debug!("Cannot stat {}: {err}", path.display());
            tally.skipped = 1;
            return tally;
        }
    };
    if !meta.is_dir() {
        tally.bytes = meta.len();
        tally.files = 1;
        return tally;
    }

    let walker = jwalk::WalkDir::new(path)
        .skip_hidden(false)
        .follow_links(false)
        .parallelism(mode.parallelism());

    for (visited, entry_result) in walker.into_iter().enumerate() {
        if visited % 1_000 == 999 && cancel.load(Ordering::Relaxed) {
            tally.cancelled = true;
            return tally;
        }

        let entry = match entry_result {
            Ok(e) => e,
            Err(err) => {
                // jwalk errors are typically access-denied on directory reads.
                warn!("Skipping unreadable entry: {err}");
                tally.skipped += 1;
                continue;
            }
        };

        let file_type = entry.file_type();
        if file_type.is_dir() {
            continue;
        }

        let entry_path = entry.path();
        // Links are counted when they point at a regular file, never followed
        // into directories.
        let meta = if file_type.is_symlink() {
            fs::metadata(&entry_path)
        } else {
            fs::symlink_metadata(&entry_path)
        };
        match meta {
            Ok(m) if m.is_file() => {
                tally.bytes += m.len();
                tally.files += 1;
                if tally.files % PROGRESS_INTERVAL == 0 {
                    on_progress(&tally, &entry_path);
                }
            }
            Ok(_) => {}
            Err(err) => {
                debug!("Skipping {}: {err}", entry_path.display());
                tally.skipped += 1;
            }
        }
    }

    if cancel.load(Ordering::Relaxed) {
        tally.cancelled = true;
    }
    tally
}

/// Recursive size of every entry in a listing, computed in parallel.
///
/// Results are in the same order as `entries`.
pub fn entry_sizes(entries: &[DirectoryEntry]) -> Vec<u64> {
    let never = AtomicBool::new(false);
    entries
        .par_iter()
        .map(|entry| walk_size(&entry.full_path, WalkMode::Serial, &never, |_, _| {}).bytes)
        .collect()
}
