//! # Session Manager
//!
//! Tracks who is signed in.
//!
//! ## Components
//!
//! - [`SessionManager`] - Login, logout and the startup identity check
//! - [`SessionHandle`] - Read-only view handed to collaborators
//! - [`AuthError`], [`IdentityCheckError`] - Classified failures

mod error;
mod manager;
mod state;

pub use error::{AuthError, IdentityCheckError};
pub use manager::SessionManager;
pub use state::{Session, SessionHandle, SessionState};
