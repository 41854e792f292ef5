//! # Upload Coordinator
//!
//! Picks up a selected file, streams it to the avatar endpoint and reports
//! progress computed from bytes the transport has actually sent.

mod coordinator;
mod error;
mod progress;

pub use coordinator::{PendingUpload, UploadCoordinator, UploadTask};
pub use error::{FileReadError, UploadError};
pub use progress::{percent, ProgressTracker};
