/// Job progress reporting — lightweight messages sent from a job thread to
/// the session via a crossbeam channel.
use crate::error::FsError;
use std::path::PathBuf;
use std::time::Duration;

/// What a finished job produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    /// Recursive size of `path`.
    Size {
        path: PathBuf,
        bytes: u64,
        files: u64,
        skipped: u64,
    },
    /// Tree copy of `src` into the new directory `dst`.
    Copied {
        src: PathBuf,
        dst: PathBuf,
        files: u64,
        bytes: u64,
    },
}

/// Progress updates sent from a job thread.
#[derive(Debug)]
pub enum JobProgress {
    /// Periodic update with running totals.
    Update {
        files_done: u64,
        bytes_done: u64,
        current_path: String,
    },
    /// The job finished.
    Complete {
        outcome: JobOutcome,
        duration: Duration,
    },
    /// The job stopped on an error; nothing partial was left behind.
    Failed(FsError),
    /// The job was cancelled by the user.
    Cancelled,
}

impl JobProgress {
    /// `true` for the last message a job sends.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Update { .. })
    }
}
