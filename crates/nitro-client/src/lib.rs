//! # Nitro Client
//!
//! Core of the Nitro avatar uploader: signs a user into the account service
//! and streams a single GIF to that user's avatar endpoint.
//!
//! ## Modules
//!
//! - [`api`] - HTTP adapter with a persistent cookie jar
//! - [`session`] - Login, logout and silent identity check
//! - [`upload`] - File selection and single-flight avatar upload
//! - [`presenter`] - Interface the core uses to talk to the UI
//! - [`storage`] - Durable key/value storage (`token`, `lang`)
//! - [`config`] - Service endpoints and client settings
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use nitro_client::{Config, JsonFileStorage, NoopPresenter, SessionManager, UploadCoordinator};
//!
//! # async fn avatar() -> Result<(), Box<dyn std::error::Error>> {
//! let presenter = Arc::new(NoopPresenter);
//! let storage = Arc::new(JsonFileStorage::open_default());
//! let mut session = SessionManager::new(Config::load(), storage, presenter.clone())?;
//! if session.initialize().await.is_err() {
//!     session.login("alice", "hunter2").await?;
//! }
//!
//! let uploads = UploadCoordinator::new(presenter);
//! let pending = uploads.select_file("avatar.gif").await?;
//! let _response = uploads
//!     .submit(&pending, &session.handle(), &session.adapter())?
//!     .run()
//!     .await?;
//!
//! session.logout().await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod api;
pub mod config;
pub mod presenter;
pub mod session;
pub mod storage;
pub mod upload;

pub use api::{ApiError, ApiResult, HttpAdapter, RequestBody, RequestDescriptor};
pub use config::Config;
pub use presenter::{Channel, NoopPresenter, Presenter, StatusKind};
pub use session::{AuthError, IdentityCheckError, Session, SessionHandle, SessionManager, SessionState};
pub use storage::{JsonFileStorage, LocalStorage, MemoryStorage};
pub use upload::{
    FileReadError, PendingUpload, ProgressTracker, UploadCoordinator, UploadError, UploadTask,
};
