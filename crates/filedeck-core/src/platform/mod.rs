/// Platform-specific functionality — volume enumeration, the trash facility,
/// and the default-application launcher.

pub mod opener;
pub mod recycle;
pub mod volumes;

pub use opener::{open_with_default_app, Opener};
pub use recycle::Trash;
pub use volumes::{
    detect_enumerator, list_volumes, DriveLetters, MountPoints, VolumeEnumerator,
    MOUNT_POINT_DIRS,
};
