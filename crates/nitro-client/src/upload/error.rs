//! # Upload Errors

use std::path::PathBuf;
use thiserror::Error;

use crate::api::ApiError;

/// The selected file could not be inspected.
#[derive(Error, Debug)]
pub enum FileReadError {
    /// Stat failed, or the path is not a regular file.
    #[error("cannot read {}: {source}", path.display())]
    CannotStat {
        /// The selected path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl FileReadError {
    /// Localization key of the user-facing message.
    #[must_use]
    pub fn message_key(&self) -> &'static str {
        match self {
            Self::CannotStat { .. } => "upload-lstat",
        }
    }
}

/// Errors from submitting or running an avatar upload.
#[derive(Error, Debug)]
pub enum UploadError {
    /// The service rejected the file (HTTP 400), usually for its size.
    #[error("avatar too large or invalid")]
    TooLarge,

    /// Any other failure.
    #[error("upload failed: {0}")]
    Unknown(#[source] ApiError),

    /// An upload is already running.
    #[error("an upload is already in progress")]
    InFlight,

    /// No user is signed in.
    #[error("not signed in")]
    NotAuthenticated,
}

impl UploadError {
    /// Localization key of the user-facing message.
    #[must_use]
    pub fn message_key(&self) -> &'static str {
        match self {
            Self::TooLarge => "upload-badsize",
            Self::Unknown(_) => "upload-unknown",
            Self::InFlight => "upload-busy",
            Self::NotAuthenticated => "upload-login",
        }
    }
}

impl From<ApiError> for UploadError {
    fn from(err: ApiError) -> Self {
        if err.status() == Some(400) {
            Self::TooLarge
        } else {
            Self::Unknown(err)
        }
    }
}
