//! # Session Manager
//!
//! Owns the session, the HTTP adapter (and with it the cookie jar) and the
//! persisted access token.

use std::sync::Arc;
use tokio::sync::watch;

use super::error::{AuthError, IdentityCheckError};
use super::state::{Session, SessionHandle, SessionState};
use crate::api::{ApiResult, HttpAdapter, LoginForm, ACCESS_TOKEN_COOKIE};
use crate::config::Config;
use crate::presenter::{Channel, Presenter, StatusKind};
use crate::storage::{keys, LocalStorage};

/// Drives the `Anonymous -> Authenticating -> Authenticated` lifecycle.
///
/// The manager is the only writer of the cookie jar and of the persisted
/// token. Collaborators observe it through [`SessionManager::handle`].
pub struct SessionManager {
    config: Config,
    storage: Arc<dyn LocalStorage>,
    presenter: Arc<dyn Presenter>,
    adapter: HttpAdapter,
    session: watch::Sender<Session>,
}

impl SessionManager {
    /// Creates an anonymous session.
    ///
    /// # Errors
    ///
    /// Fails if the HTTP adapter cannot be built from `config`.
    pub fn new(
        config: Config,
        storage: Arc<dyn LocalStorage>,
        presenter: Arc<dyn Presenter>,
    ) -> ApiResult<Self> {
        let adapter = HttpAdapter::new(&config)?;
        let (session, _) = watch::channel(Session::default());
        Ok(Self {
            config,
            storage,
            presenter,
            adapter,
            session,
        })
    }

    /// Returns a read-only handle on the session.
    #[must_use]
    pub fn handle(&self) -> SessionHandle {
        SessionHandle::new(self.session.subscribe())
    }

    /// Returns the adapter carrying this session's cookies.
    #[must_use]
    pub fn adapter(&self) -> HttpAdapter {
        self.adapter.clone()
    }

    /// Startup sequence: restore a persisted token and check who it belongs
    /// to.
    ///
    /// A 401 leaves the session anonymous without telling the user. Other
    /// failures are logged and also leave it anonymous.
    ///
    /// # Errors
    ///
    /// Returns the classified failure so callers can tell the two apart.
    pub async fn initialize(&self) -> Result<u64, IdentityCheckError> {
        let token = self.storage.get_item(keys::TOKEN);
        if let Some(token) = &token {
            self.adapter.install_cookie(ACCESS_TOKEN_COOKIE, token);
        }

        match self.adapter.whoami().await {
            Ok(who) => {
                self.session
                    .send_replace(Session::authenticated(who.user_id, token));
                tracing::info!(user_id = who.user_id, "Restored session");
                self.presenter
                    .report_status(Channel::Login, StatusKind::Success, "login-auto");
                Ok(who.user_id)
            }
            Err(e) => {
                let err = IdentityCheckError::from(e);
                match &err {
                    IdentityCheckError::Unauthorized => {
                        tracing::debug!(had_token = token.is_some(), "No active session");
                    }
                    IdentityCheckError::Unknown(e) => {
                        tracing::error!(error = %e, "Unexpected identity check failure");
                    }
                }
                Err(err)
            }
        }
    }

    /// Logs in with a username and password.
    ///
    /// On success the token is persisted and installed as a long-lived
    /// cookie. On failure the session returns to anonymous and the reason is
    /// reported on the login channel.
    ///
    /// # Errors
    ///
    /// * [`AuthError::BadCredentials`] - The service answered 401
    /// * [`AuthError::Unknown`] - Any other failure
    /// * [`AuthError::AlreadyAuthenticated`] / [`AuthError::InProgress`] -
    ///   The session is not anonymous; no request is sent
    pub async fn login(&self, username: &str, password: &str) -> Result<u64, AuthError> {
        let mut rejected = None;
        self.session.send_if_modified(|s| match s.state {
            SessionState::Anonymous => {
                s.state = SessionState::Authenticating;
                true
            }
            SessionState::Authenticating => {
                rejected = Some(AuthError::InProgress);
                false
            }
            SessionState::Authenticated => {
                rejected = Some(AuthError::AlreadyAuthenticated);
                false
            }
        });
        if let Some(err) = rejected {
            return Err(err);
        }

        let form = LoginForm {
            username: username.to_string(),
            password: password.to_string(),
        };

        let mut attempt = LoginAttempt::begin(&self.session, self.presenter.as_ref());
        let result = self.adapter.request_token(&form).await;
        attempt.end_busy();

        match result {
            Ok(token) => {
                self.adapter
                    .install_cookie(ACCESS_TOKEN_COOKIE, &token.access_token);
                self.storage.set_item(keys::TOKEN, &token.access_token);
                self.session.send_replace(Session::authenticated(
                    token.user_id,
                    Some(token.access_token),
                ));
                tracing::info!(user_id = token.user_id, "Logged in");
                attempt.settle();
                self.presenter
                    .report_status(Channel::Login, StatusKind::Success, "login-success");
                Ok(token.user_id)
            }
            Err(e) => {
                drop(attempt);
                let err = AuthError::from(e);
                if let AuthError::Unknown(e) = &err {
                    tracing::error!(error = %e, "Unexpected login failure");
                } else {
                    tracing::info!(username = %form.username, "Login rejected");
                }
                self.presenter
                    .report_status(Channel::Login, StatusKind::Error, err.message_key());
                Err(err)
            }
        }
    }

    /// Logs out and runs the startup sequence again from scratch.
    ///
    /// The persisted token is removed and the cookie jar is discarded along
    /// with the old adapter.
    ///
    /// # Errors
    ///
    /// Fails only if a fresh HTTP adapter cannot be built.
    pub async fn logout(&mut self) -> ApiResult<()> {
        self.storage.remove_item(keys::TOKEN);
        self.adapter = HttpAdapter::new(&self.config)?;
        self.session.send_replace(Session::default());
        tracing::info!("Logged out");

        if let Err(e) = self.initialize().await {
            tracing::debug!(error = %e, "Session not restored after logout");
        }
        Ok(())
    }
}

/// Holds the busy indicator and the `Authenticating` state for one login.
///
/// Unless settled, dropping it (including when the login future itself is
/// dropped) returns the session to anonymous. `hide_busy` fires exactly once.
struct LoginAttempt<'a> {
    session: &'a watch::Sender<Session>,
    presenter: &'a dyn Presenter,
    busy: bool,
    settled: bool,
}

impl<'a> LoginAttempt<'a> {
    fn begin(session: &'a watch::Sender<Session>, presenter: &'a dyn Presenter) -> Self {
        presenter.show_busy();
        Self {
            session,
            presenter,
            busy: true,
            settled: false,
        }
    }

    fn end_busy(&mut self) {
        if std::mem::take(&mut self.busy) {
            self.presenter.hide_busy();
        }
    }

    fn settle(mut self) {
        self.settled = true;
    }
}

impl Drop for LoginAttempt<'_> {
    fn drop(&mut self) {
        self.end_busy();
        if !self.settled {
            self.session.send_if_modified(|s| {
                if s.state == SessionState::Authenticating {
                    *s = Session::default();
                    true
                } else {
                    false
                }
            });
        }
    }
}
