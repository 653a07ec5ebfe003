/// FileDeck Session — the state a frontend keeps between core calls.
///
/// The core is stateless; this crate owns the current directory, the
/// clipboard, the last listing snapshot, any running background job, and the
/// messages a frontend should show. Every user action of a file browser maps
/// to one synchronous method here followed by a refresh.
pub mod state;
pub mod status;

pub use state::{ActiveJob, JobKind, Session};
pub use status::{StatusLevel, StatusMessage};
