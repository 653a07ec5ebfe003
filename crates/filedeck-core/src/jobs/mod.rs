/// Background jobs — the long-running operations moved off the caller's
/// thread.
///
/// Only recursive size computation and tree copies scale with data volume,
/// so only those run here. Each job gets a named thread, a bounded progress
/// channel, and a cancellation flag. Mutating jobs take a per-path lock from
/// [`PathLocks`] so two copies into the same destination run one after the
/// other.
pub mod locks;

pub use locks::PathLocks;

use crate::error::{FsError, FsResult};
use crate::ops::{self, CopyOutcome};
use crate::scanner::progress::{JobOutcome, JobProgress};
use crate::scanner::{self, WalkMode};
use crossbeam_channel::{Receiver, Sender};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use tracing::info;

/// Maximum number of progress messages that may queue up in a job channel.
///
/// Updates are sent every thousand files, so a session that polls a few
/// times a second never gets close. A stalled consumer makes the job wait
/// rather than grow the queue.
pub const JOB_CHANNEL_CAPACITY: usize = 1_024;

/// Handle to a running or completed job.
pub struct JobHandle {
    /// Receiver for progress updates from the job thread.
    pub progress_rx: Receiver<JobProgress>,
    /// Flag to request cancellation.
    cancel_flag: Arc<AtomicBool>,
    /// Join handle for the job thread.
    _thread: Option<thread::JoinHandle<()>>,
}

impl JobHandle {
    /// Request the job to stop as soon as possible.
    pub fn cancel(&self) {
        self.cancel_flag.store(true, Ordering::Relaxed);
    }

    /// Check whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancel_flag.load(Ordering::Relaxed)
    }

    /// Block until the job sends its terminal message.
    ///
    /// Returns `None` if the thread went away without one.
    pub fn wait(self) -> Option<JobProgress> {
        self.progress_rx.iter().find(JobProgress::is_terminal)
    }
}

fn spawn_job<F>(name: &str, work: F) -> FsResult<JobHandle>
where
    F: FnOnce(Sender<JobProgress>, Arc<AtomicBool>) + Send + 'static,
{
    let (progress_tx, progress_rx) = crossbeam_channel::bounded(JOB_CHANNEL_CAPACITY);
    let cancel_flag = Arc::new(AtomicBool::new(false));
    let cancel_clone = cancel_flag.clone();

    let thread = thread::Builder::new()
        .name(format!("filedeck-{name}"))
        .spawn(move || work(progress_tx, cancel_clone))
        .map_err(|err| FsError::from_io(err, Path::new(name)))?;

    Ok(JobHandle {
        progress_rx,
        cancel_flag,
        _thread: Some(thread),
    })
}

/// Compute the recursive size of `path` on a background thread.
pub fn start_size_job(path: PathBuf) -> FsResult<JobHandle> {
    spawn_job("size", move |tx, cancel| {
        info!("Starting size job for {}", path.display());
        let start = Instant::now();

        let tally = scanner::walk_size(&path, WalkMode::Parallel, &cancel, |tally, current| {
            let _ = tx.send(JobProgress::Update {
                files_done: tally.files,
                bytes_done: tally.bytes,
                current_path: current.to_string_lossy().into_owned(),
            });
        });

        let msg = if tally.cancelled {
            JobProgress::Cancelled
        } else {
            JobProgress::Complete {
                outcome: JobOutcome::Size {
                    path,
                    bytes: tally.bytes,
                    files: tally.files,
                    skipped: tally.skipped,
                },
                duration: start.elapsed(),
            }
        };
        let _ = tx.send(msg);
    })
}

/// Copy the directory `src` to the new directory `dst` on a background
/// thread.
///
/// The job holds the `dst` lock from `locks` for its whole run. Failure and
/// cancellation both remove the partially written destination.
pub fn start_copy_tree_job(src: PathBuf, dst: PathBuf, locks: &PathLocks) -> FsResult<JobHandle> {
    let locks = locks.clone();
    spawn_job("copy", move |tx, cancel| {
        let _guard = locks.acquire(&dst);
        info!("Starting copy job {} -> {}", src.display(), dst.display());
        let start = Instant::now();

        let mut since_update = 0u64;
        let result = ops::copy_tree_with(&src, &dst, &cancel, |current, stats| {
            since_update += 1;
            if since_update >= 100 {
                since_update = 0;
                let _ = tx.send(JobProgress::Update {
                    files_done: stats.files,
                    bytes_done: stats.bytes,
                    current_path: current.to_string_lossy().into_owned(),
                });
            }
        });

        let msg = match result {
            Ok(CopyOutcome::Completed(stats)) => JobProgress::Complete {
                outcome: JobOutcome::Copied {
                    src,
                    dst,
                    files: stats.files,
                    bytes: stats.bytes,
                },
                duration: start.elapsed(),
            },
            Ok(CopyOutcome::Cancelled) => JobProgress::Cancelled,
            Err(err) => JobProgress::Failed(err),
        };
        let _ = tx.send(msg);
    })
}
