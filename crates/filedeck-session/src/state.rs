/// Session state management.
///
/// Centralises all mutable state a file-browser frontend reads and writes.
/// Core calls are synchronous; the only asynchronous work is a background
/// job (recursive size or tree copy) whose messages are drained in
/// [`Session::process_job_messages`], which a frontend calls once per frame
/// or poll tick.
///
/// Mutations never update `entries` directly; each one is followed by a
/// re-listing of the current directory.
use crate::status::StatusMessage;
use filedeck_core::jobs::{self, JobHandle, PathLocks};
use filedeck_core::model::entry::{DirectoryEntry, PathProperties, Volume};
use filedeck_core::platform::{self, Trash};
use filedeck_core::scanner::progress::{JobOutcome, JobProgress};
use filedeck_core::{listing, ops, FsError, FsResult, ListOptions, NavigationState};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Maximum number of job-progress messages drained per poll.
///
/// Prevents a backlog (e.g. after the frontend was suspended) from blocking
/// the caller for a perceptible duration.
const MAX_MESSAGES_PER_POLL: usize = 300;

/// Maximum retained status messages. Oldest are dropped first.
pub const MAX_STATUS_MESSAGES: usize = 100;

/// Location used when no volume could be enumerated.
const FALLBACK_ROOT: &str = "/";

/// What a background job is doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobKind {
    Size { path: PathBuf },
    Copy { src: PathBuf, dst: PathBuf },
}

/// A background job plus its latest counters.
pub struct ActiveJob {
    pub kind: JobKind,
    pub handle: JobHandle,
    pub files_done: u64,
    pub bytes_done: u64,
    pub current_path: String,
}

/// All session state.
pub struct Session {
    // ── Volumes ────────────────────────────────────────
    pub volumes: Vec<Volume>,
    pub selected_volume_index: Option<usize>,

    // ── Directory ──────────────────────────────────────
    pub navigation: NavigationState,
    /// Snapshot of the current directory from the last successful listing.
    pub entries: Vec<DirectoryEntry>,
    pub list_options: ListOptions,

    // ── Clipboard ──────────────────────────────────────
    /// Path reference only; content is read at paste time.
    pub clipboard: Option<PathBuf>,

    // ── Jobs ───────────────────────────────────────────
    pub job: Option<ActiveJob>,
    /// Result of the most recent completed size job.
    pub last_size: Option<(PathBuf, u64)>,
    pub job_duration: Option<Duration>,

    // ── Messages ───────────────────────────────────────
    pub messages: Vec<StatusMessage>,

    locks: PathLocks,
    trash: Trash,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Create a session over the host's volumes and trash facility.
    pub fn new() -> Self {
        Self::with_parts(platform::list_volumes(), Trash::detect())
    }

    /// Create a session from explicit parts. Nothing is listed yet.
    pub fn with_parts(volumes: Vec<Volume>, trash: Trash) -> Self {
        let selected = if volumes.is_empty() { None } else { Some(0) };
        Self {
            volumes,
            selected_volume_index: selected,
            navigation: NavigationState::new(),
            entries: Vec::new(),
            list_options: ListOptions::default(),
            clipboard: None,
            job: None,
            last_size: None,
            job_duration: None,
            messages: Vec::new(),
            locks: PathLocks::new(),
            trash,
        }
    }

    /// The directory shown when the session opens: the first volume, or `/`.
    pub fn default_location(&self) -> PathBuf {
        self.volumes
            .first()
            .map(|v| v.path.clone())
            .unwrap_or_else(|| PathBuf::from(FALLBACK_ROOT))
    }

    /// Load [`Session::default_location`].
    pub fn open_default(&mut self) -> FsResult<()> {
        let location = self.default_location();
        self.load_directory(&location)
    }

    pub fn current_path(&self) -> Option<&Path> {
        self.navigation.current()
    }

    pub fn trash(&self) -> Trash {
        self.trash
    }

    // ── Navigation ─────────────────────────────────────

    /// List `path` and make it the current directory.
    ///
    /// On failure the current directory and snapshot are left as they were
    /// and a message is recorded.
    pub fn load_directory(&mut self, path: &Path) -> FsResult<()> {
        let entries = self.report(listing::list_directory_with(path, self.list_options))?;
        debug!("Session now at {} ({} entries)", path.display(), entries.len());
        self.entries = entries;
        self.navigation.set_current(path.to_path_buf());
        Ok(())
    }

    /// Re-list the current directory.
    pub fn refresh(&mut self) -> FsResult<()> {
        match self.navigation.current().map(Path::to_path_buf) {
            Some(current) => self.load_directory(&current),
            None => Ok(()),
        }
    }

    /// Switch to the volume at `index` and list its root.
    pub fn select_volume(&mut self, index: usize) -> FsResult<()> {
        let Some(volume) = self.volumes.get(index) else {
            return Ok(());
        };
        let root = volume.path.clone();
        self.selected_volume_index = Some(index);
        self.load_directory(&root)
    }

    /// Move to the parent directory. Returns `false` at a root.
    pub fn go_back(&mut self) -> FsResult<bool> {
        match self.navigation.parent() {
            Some(parent) => self.load_directory(&parent).map(|()| true),
            None => Ok(false),
        }
    }

    /// Enter a directory entry, or open a file with the default application.
    pub fn open_entry(&mut self, entry: &DirectoryEntry) -> FsResult<()> {
        if entry.is_dir() {
            self.load_directory(&entry.full_path)
        } else {
            self.report(platform::open_with_default_app(&entry.full_path))
        }
    }

    // ── Clipboard ──────────────────────────────────────

    /// Remember `path` as the paste source, replacing any previous one.
    pub fn copy_to_clipboard(&mut self, path: &Path) {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.clipboard = Some(path.to_path_buf());
        self.push_message(StatusMessage::info("Copied", format!("{name} copied.")));
    }

    /// Paste the clipboard into the current directory, synchronously.
    ///
    /// Returns the created path, or `None` with nothing to paste.
    pub fn paste(&mut self) -> FsResult<Option<PathBuf>> {
        let (Some(source), Some(dest_dir)) = (self.clipboard.clone(), self.current_dir()) else {
            return Ok(None);
        };
        let created = self.report(ops::paste_into(&source, &dest_dir))?;
        self.refresh()?;
        Ok(Some(created))
    }

    /// Paste the clipboard, moving directory copies onto a background job.
    ///
    /// Files are pasted immediately. Returns `true` if a job was started.
    /// Fails while another job is running.
    pub fn start_paste_job(&mut self) -> FsResult<bool> {
        let (Some(source), Some(dest_dir)) = (self.clipboard.clone(), self.current_dir()) else {
            return Ok(false);
        };
        if !source.is_dir() {
            self.paste()?;
            return Ok(false);
        }
        let name = source
            .file_name()
            .ok_or_else(|| FsError::other(&source, "has no file name"))?;
        let dst = dest_dir.join(name);
        self.ensure_idle(&dst)?;

        let handle = self.report(jobs::start_copy_tree_job(
            source.clone(),
            dst.clone(),
            &self.locks,
        ))?;
        self.begin_job(JobKind::Copy { src: source, dst }, handle);
        Ok(true)
    }

    // ── Mutations ──────────────────────────────────────

    /// Move `path` to the trash. Confirmation is the frontend's job.
    pub fn delete(&mut self, path: &Path) -> FsResult<()> {
        self.report(self.trash.delete(path))?;
        if self.clipboard.as_deref() == Some(path) {
            self.clipboard = None;
        }
        self.refresh()
    }

    /// Rename `path` to `new_name` inside its own directory.
    pub fn rename(&mut self, path: &Path, new_name: &str) -> FsResult<PathBuf> {
        let new_path = self.report(ops::rename_in_place(path, new_name))?;
        self.refresh()?;
        Ok(new_path)
    }

    /// Create `name` inside the current directory.
    pub fn create_folder(&mut self, name: &str) -> FsResult<PathBuf> {
        let Some(current) = self.current_dir() else {
            return Err(FsError::other(Path::new(name), "no current directory"));
        };
        let path = current.join(name);
        self.report(ops::create_directory(&path))?;
        self.refresh()?;
        Ok(path)
    }

    /// Properties of `path`, with its recursive size computed inline.
    pub fn properties(&mut self, path: &Path) -> FsResult<PathProperties> {
        self.report(ops::path_properties(path))
    }

    // ── Jobs ───────────────────────────────────────────

    /// Compute the size of `path` on a background job.
    ///
    /// Fails while another job is running; the running job is left alone.
    pub fn start_size_job(&mut self, path: PathBuf) -> FsResult<()> {
        self.ensure_idle(&path)?;
        let handle = self.report(jobs::start_size_job(path.clone()))?;
        self.begin_job(JobKind::Size { path }, handle);
        Ok(())
    }

    /// Cancel the running job, if any.
    pub fn cancel_job(&mut self) {
        if let Some(ref job) = self.job {
            job.handle.cancel();
        }
    }

    pub fn is_busy(&self) -> bool {
        self.job.is_some()
    }

    /// Process pending job messages. Call once per frame or poll tick.
    ///
    /// Returns `true` if anything changed.
    pub fn process_job_messages(&mut self) -> bool {
        let mut changed = false;
        let mut finished: Option<JobProgress> = None;
        let mut disconnected = false;

        if let Some(job) = self.job.as_mut() {
            let mut messages_this_poll = 0usize;
            while messages_this_poll < MAX_MESSAGES_PER_POLL {
                let msg = match job.handle.progress_rx.try_recv() {
                    Ok(m) => m,
                    Err(err) => {
                        disconnected = err.is_disconnected();
                        break;
                    }
                };
                messages_this_poll += 1;
                changed = true;
                match msg {
                    JobProgress::Update {
                        files_done,
                        bytes_done,
                        current_path,
                    } => {
                        job.files_done = files_done;
                        job.bytes_done = bytes_done;
                        job.current_path = current_path;
                    }
                    terminal => {
                        finished = Some(terminal);
                        break;
                    }
                }
            }
        }

        if let Some(terminal) = finished {
            self.job = None;
            self.finish_job(terminal);
        } else if disconnected {
            // The job thread went away without a terminal message.
            self.job = None;
            self.push_message(StatusMessage::info("Stopped", "Operation ended unexpectedly."));
            changed = true;
        }
        changed
    }

    /// Block until the running job finishes, polling every `interval`.
    pub fn wait_for_job(&mut self, interval: Duration) {
        while self.job.is_some() {
            if !self.process_job_messages() {
                std::thread::sleep(interval);
            }
        }
    }

    /// A running job is never replaced; it has to finish or be cancelled
    /// explicitly first.
    fn ensure_idle(&mut self, path: &Path) -> FsResult<()> {
        match self.job {
            Some(ref job) => {
                debug!("Refusing new job on {} while {:?} runs", path.display(), job.kind);
                self.report(Err(FsError::other(path, "another operation is still running")))
            }
            None => Ok(()),
        }
    }

    fn begin_job(&mut self, kind: JobKind, handle: JobHandle) {
        info!("Job started: {kind:?}");
        self.job_duration = None;
        self.job = Some(ActiveJob {
            kind,
            handle,
            files_done: 0,
            bytes_done: 0,
            current_path: String::new(),
        });
    }

    fn finish_job(&mut self, terminal: JobProgress) {
        match terminal {
            JobProgress::Complete { outcome, duration } => {
                self.job_duration = Some(duration);
                match outcome {
                    JobOutcome::Size { path, bytes, .. } => {
                        self.push_message(StatusMessage::info(
                            "Size",
                            format!(
                                "{}: {}",
                                path.display(),
                                filedeck_core::format_size(bytes)
                            ),
                        ));
                        self.last_size = Some((path, bytes));
                    }
                    JobOutcome::Copied { dst, files, .. } => {
                        self.push_message(StatusMessage::info(
                            "Pasted",
                            format!("{} ({files} files)", dst.display()),
                        ));
                        let _ = self.refresh();
                    }
                }
            }
            JobProgress::Failed(err) => {
                self.push_message(StatusMessage::from_error(&err));
            }
            JobProgress::Cancelled => {
                self.push_message(StatusMessage::info("Cancelled", "Operation cancelled."));
            }
            JobProgress::Update { .. } => {}
        }
    }

    // ── Messages ───────────────────────────────────────

    /// Take every pending message, oldest first.
    pub fn drain_messages(&mut self) -> Vec<StatusMessage> {
        std::mem::take(&mut self.messages)
    }

    fn push_message(&mut self, msg: StatusMessage) {
        if self.messages.len() >= MAX_STATUS_MESSAGES {
            self.messages.remove(0);
        }
        self.messages.push(msg);
    }

    /// Record an error as a message and pass the result through.
    fn report<T>(&mut self, result: FsResult<T>) -> FsResult<T> {
        if let Err(ref err) = result {
            self.push_message(StatusMessage::from_error(err));
        }
        result
    }

    fn current_dir(&self) -> Option<PathBuf> {
        self.navigation.current().map(Path::to_path_buf)
    }
}
