/// Volume enumeration.
///
/// Two strategies sit behind the [`VolumeEnumerator`] trait:
///
/// - [`DriveLetters`] probes the 26-bit logical-drive bitmask and reports
///   every present letter as `X:\`.
/// - [`MountPoints`] reports `/` plus every directory found directly under
///   the conventional mount directories.
///
/// [`detect_enumerator`] picks one by probing for drive-letter support at
/// runtime. Results are recomputed on every call and never cached.
use crate::model::Volume;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Conventional mount directories, processed in this order.
pub const MOUNT_POINT_DIRS: [&str; 3] = ["/mnt", "/media", "/Volumes"];

/// A source of navigable storage roots.
pub trait VolumeEnumerator: Send + Sync {
    /// Short strategy name for logs.
    fn name(&self) -> &'static str;

    /// Enumerate roots. Never fails: an unsupported probe yields an empty vec.
    fn list_volumes(&self) -> Vec<Volume>;
}

// ── Drive letters ────────────────────────────────────────────────────────────

/// Drive-letter enumeration backed by a logical-drive bitmask query.
#[derive(Debug, Clone, Copy)]
pub struct DriveLetters {
    query: fn() -> Option<u32>,
}

impl DriveLetters {
    /// Return the strategy only if the host answers the bitmask query.
    pub fn probe() -> Option<Self> {
        let mask = logical_drive_mask()?;
        debug!("Logical drive bitmask: {mask:#010x}");
        Some(Self {
            query: logical_drive_mask,
        })
    }

    /// Decode a logical-drive bitmask: bit 0 is `A:`, bit 25 is `Z:`.
    pub fn from_bitmask(mask: u32) -> Vec<Volume> {
        (0..26u8)
            .filter(|bit| mask & (1 << bit) != 0)
            .map(|bit| Volume::new(format!("{}:\\", char::from(b'A' + bit))))
            .collect()
    }
}

impl VolumeEnumerator for DriveLetters {
    fn name(&self) -> &'static str {
        "drive-letters"
    }

    fn list_volumes(&self) -> Vec<Volume> {
        match (self.query)() {
            Some(mask) => Self::from_bitmask(mask),
            None => {
                warn!("Logical drive query failed");
                Vec::new()
            }
        }
    }
}

#[cfg(windows)]
fn logical_drive_mask() -> Option<u32> {
    // Returns 0 on failure.
    let mask = unsafe { windows::Win32::Storage::FileSystem::GetLogicalDrives() };
    (mask != 0).then_some(mask)
}

#[cfg(not(windows))]
fn logical_drive_mask() -> Option<u32> {
    None
}

// ── Mount points ─────────────────────────────────────────────────────────────

/// Root-plus-mount-directories enumeration.
#[derive(Debug, Clone)]
pub struct MountPoints {
    root: PathBuf,
    mount_dirs: Vec<PathBuf>,
}

impl Default for MountPoints {
    fn default() -> Self {
        Self::new("/", MOUNT_POINT_DIRS.iter().map(PathBuf::from))
    }
}

impl MountPoints {
    /// Build an enumerator with a custom root and mount directory list.
    pub fn new(root: impl Into<PathBuf>, mount_dirs: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            root: root.into(),
            mount_dirs: mount_dirs.into_iter().collect(),
        }
    }
}

impl VolumeEnumerator for MountPoints {
    fn name(&self) -> &'static str {
        "mount-points"
    }

    fn list_volumes(&self) -> Vec<Volume> {
        let mut volumes = vec![Volume::new(self.root.clone())];

        for mount_dir in &self.mount_dirs {
            // Missing mount directories are normal (no /Volumes on Linux).
            let reader = match fs::read_dir(mount_dir) {
                Ok(r) => r,
                Err(err) => {
                    debug!("Skipping mount dir {}: {err}", mount_dir.display());
                    continue;
                }
            };

            for entry in reader.flatten() {
                let path = entry.path();
                // Follow links: /Volumes/Macintosh HD is a symlink to /.
                if fs::metadata(&path).map(|m| m.is_dir()).unwrap_or(false) {
                    volumes.push(Volume::new(path));
                }
            }
        }

        volumes
    }
}

// ── Selection ────────────────────────────────────────────────────────────────

/// Pick the enumeration strategy for this host.
pub fn detect_enumerator() -> Box<dyn VolumeEnumerator> {
    match DriveLetters::probe() {
        Some(letters) => Box::new(letters),
        None => Box::new(MountPoints::default()),
    }
}

/// Enumerate the navigable roots of this host.
pub fn list_volumes() -> Vec<Volume> {
    let enumerator = detect_enumerator();
    let volumes = enumerator.list_volumes();
    debug!(
        "{} enumerator found {} volume(s)",
        enumerator.name(),
        volumes.len()
    );
    volumes
}
