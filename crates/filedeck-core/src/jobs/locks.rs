/// Per-path serialization for mutating jobs.
use parking_lot::{Condvar, Mutex};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Default)]
struct Registry {
    busy: Mutex<HashSet<PathBuf>>,
    released: Condvar,
}

/// Registry of paths currently being mutated by a job.
///
/// Cloning shares the registry.
#[derive(Clone, Default)]
pub struct PathLocks {
    inner: Arc<Registry>,
}

/// Held while a job mutates `path`. Released on drop.
pub struct PathGuard {
    inner: Arc<Registry>,
    path: PathBuf,
}

impl PathLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Block until no other guard holds `path`, then take it.
    pub fn acquire(&self, path: &Path) -> PathGuard {
        let mut busy = self.inner.busy.lock();
        while busy.contains(path) {
            self.inner.released.wait(&mut busy);
        }
        busy.insert(path.to_path_buf());

        PathGuard {
            inner: self.inner.clone(),
            path: path.to_path_buf(),
        }
    }

    /// `true` if some guard currently holds `path`.
    pub fn is_held(&self, path: &Path) -> bool {
        self.inner.busy.lock().contains(path)
    }

    /// Number of paths currently held.
    pub fn len(&self) -> usize {
        self.inner.busy.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Drop for PathGuard {
    fn drop(&mut self) {
        self.inner.busy.lock().remove(&self.path);
        self.inner.released.notify_all();
    }
}
