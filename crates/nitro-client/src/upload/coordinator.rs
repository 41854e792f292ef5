//! # Upload Coordinator
//!
//! File selection and the single-flight avatar upload.

use parking_lot::Mutex;
use serde_json::Value;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::error::{FileReadError, UploadError};
use super::progress::ProgressTracker;
use crate::api::HttpAdapter;
use crate::presenter::{Channel, Presenter, StatusKind};
use crate::session::SessionHandle;

/// A selected file whose size is known. Only [`UploadCoordinator::select_file`]
/// creates one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingUpload {
    file_path: PathBuf,
    file_size_bytes: u64,
}

impl PendingUpload {
    /// Path of the selected file.
    #[must_use]
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Size of the file when it was selected.
    #[must_use]
    pub fn file_size_bytes(&self) -> u64 {
        self.file_size_bytes
    }
}

/// Coordinates avatar uploads. At most one upload runs at a time.
pub struct UploadCoordinator {
    presenter: Arc<dyn Presenter>,
    in_flight: Arc<AtomicBool>,
}

impl UploadCoordinator {
    /// Creates a coordinator reporting to `presenter`.
    pub fn new(presenter: Arc<dyn Presenter>) -> Self {
        Self {
            presenter,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether an upload is currently running.
    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Stats `path` and makes it eligible for upload.
    ///
    /// # Errors
    ///
    /// [`FileReadError::CannotStat`] if the file cannot be inspected or is
    /// not a regular file. The failure is also reported on the upload
    /// channel.
    pub async fn select_file(&self, path: impl AsRef<Path>) -> Result<PendingUpload, FileReadError> {
        let path = path.as_ref();
        let stat = tokio::fs::metadata(path).await.and_then(|meta| {
            if meta.is_file() {
                Ok(meta.len())
            } else {
                Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "not a regular file",
                ))
            }
        });

        match stat {
            Ok(size) => {
                tracing::debug!(path = %path.display(), size, "Selected avatar");
                Ok(PendingUpload {
                    file_path: path.to_path_buf(),
                    file_size_bytes: size,
                })
            }
            Err(source) => {
                let err = FileReadError::CannotStat {
                    path: path.to_path_buf(),
                    source,
                };
                tracing::error!(error = %err, "Failed to stat avatar");
                self.presenter
                    .report_status(Channel::Upload, StatusKind::Error, err.message_key());
                Err(err)
            }
        }
    }

    /// Claims the upload slot and returns the task to run.
    ///
    /// This never waits: a second call while an upload is running is
    /// rejected before any request is built. The busy indicator is shown
    /// here and hidden when the returned task finishes or is dropped.
    ///
    /// # Errors
    ///
    /// * [`UploadError::NotAuthenticated`] - The session has no user
    /// * [`UploadError::InFlight`] - Another upload is running
    pub fn submit(
        &self,
        pending: &PendingUpload,
        session: &SessionHandle,
        adapter: &HttpAdapter,
    ) -> Result<UploadTask, UploadError> {
        let user_id = session.user_id().ok_or(UploadError::NotAuthenticated)?;

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::warn!("Upload rejected, another one is in flight");
            return Err(UploadError::InFlight);
        }

        self.presenter.show_busy();
        let guard = InFlightGuard {
            flag: self.in_flight.clone(),
            presenter: self.presenter.clone(),
        };

        Ok(UploadTask {
            _guard: guard,
            adapter: adapter.clone(),
            presenter: self.presenter.clone(),
            pending: pending.clone(),
            user_id,
        })
    }
}

/// Releases the upload slot and hides the busy indicator when dropped.
struct InFlightGuard {
    flag: Arc<AtomicBool>,
    presenter: Arc<dyn Presenter>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
        self.presenter.hide_busy();
    }
}

/// A claimed upload, ready to run.
///
/// Dropping it without running releases the slot as well.
pub struct UploadTask {
    _guard: InFlightGuard,
    adapter: HttpAdapter,
    presenter: Arc<dyn Presenter>,
    pending: PendingUpload,
    user_id: u64,
}

impl UploadTask {
    /// The user the avatar is uploaded for.
    #[must_use]
    pub fn user_id(&self) -> u64 {
        self.user_id
    }

    /// Streams the file to the avatar endpoint and reports the outcome.
    ///
    /// # Errors
    ///
    /// * [`UploadError::TooLarge`] - The service answered 400
    /// * [`UploadError::Unknown`] - Any other failure
    pub async fn run(self) -> Result<Value, UploadError> {
        let total = self.pending.file_size_bytes;
        let tracker = Arc::new(Mutex::new(ProgressTracker::new(total)));

        if let Some(pct) = tracker.lock().update(0) {
            self.presenter.report_progress(pct);
        }

        let observer = {
            let tracker = tracker.clone();
            let presenter = self.presenter.clone();
            move |flushed: u64| {
                if let Some(pct) = tracker.lock().update(flushed) {
                    presenter.report_progress(pct);
                }
            }
        };

        tracing::info!(
            user_id = self.user_id,
            path = %self.pending.file_path.display(),
            size = total,
            "Uploading avatar"
        );
        let result = self
            .adapter
            .upload_avatar(self.user_id, &self.pending.file_path, total, observer)
            .await;

        match result {
            Ok(body) => {
                tracing::info!(response = %body, "Avatar uploaded");
                self.presenter
                    .report_status(Channel::Upload, StatusKind::Success, "upload-success");
                Ok(body)
            }
            Err(e) => {
                let err = UploadError::from(e);
                tracing::error!(error = %err, "Avatar upload failed");
                self.presenter
                    .report_status(Channel::Upload, StatusKind::Error, err.message_key());
                Err(err)
            }
        }
    }
}
