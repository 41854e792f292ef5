//! # Session State
//!
//! The session snapshot and the read-only handle collaborators observe it
//! through.

use tokio::sync::watch;

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No user is signed in.
    #[default]
    Anonymous,
    /// A login request is outstanding.
    Authenticating,
    /// A user is signed in; uploads are allowed.
    Authenticated,
}

/// Snapshot of the current session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    /// Lifecycle state.
    pub state: SessionState,
    /// User id, only set by a login or identity-check response.
    pub user_id: Option<u64>,
    /// Access token of the signed-in user.
    pub access_token: Option<String>,
}

impl Session {
    pub(crate) fn authenticated(user_id: u64, access_token: Option<String>) -> Self {
        Self {
            state: SessionState::Authenticated,
            user_id: Some(user_id),
            access_token,
        }
    }
}

/// Read-only view of the session owned by a [`SessionManager`].
///
/// Cheap to clone. Entering [`SessionState::Authenticated`] is what puts the
/// UI into upload mode.
///
/// [`SessionManager`]: super::SessionManager
#[derive(Debug, Clone)]
pub struct SessionHandle {
    rx: watch::Receiver<Session>,
}

impl SessionHandle {
    pub(crate) fn new(rx: watch::Receiver<Session>) -> Self {
        Self { rx }
    }

    /// Returns a copy of the current session.
    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.rx.borrow().clone()
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.rx.borrow().state
    }

    /// Whether a user is signed in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state() == SessionState::Authenticated
    }

    /// The signed-in user's id, if any.
    #[must_use]
    pub fn user_id(&self) -> Option<u64> {
        let session = self.rx.borrow();
        match session.state {
            SessionState::Authenticated => session.user_id,
            _ => None,
        }
    }

    /// Waits until the session changes. Returns `false` once the manager is
    /// gone.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}
