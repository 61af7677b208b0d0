//! Authentication manager.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, warn};

use crate::api::{ApiError, Credentials, ServerApi};

use super::error::{AuthError, AuthResult};
use super::types::AuthState;

/// Owns the session state and the calls that change it.
///
/// The manager is the single writer of [`AuthState`]; everything else in
/// the crate observes it through [`subscribe`](Self::subscribe). The
/// location service reads the signal to gate its sync ticks.
pub struct AuthManager {
    api: Arc<dyn ServerApi>,
    state: watch::Sender<AuthState>,
}

impl AuthManager {
    /// Creates a manager starting in the anonymous state.
    #[must_use]
    pub fn new(api: Arc<dyn ServerApi>) -> Self {
        let (state, _) = watch::channel(AuthState::Anonymous);
        Self { api, state }
    }

    /// Returns a snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    /// Returns whether a user is currently signed in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    /// Subscribes to state changes.
    ///
    /// The receiver immediately holds the current value; `changed()`
    /// resolves on every later transition.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    /// Registers a new account. Does not sign in; callers follow up with
    /// [`login`](Self::login).
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::SignupRejected`] when the server refuses the
    /// account (username taken), or the underlying API error otherwise.
    pub async fn signup(&self, credentials: &Credentials) -> AuthResult<()> {
        match self.api.signup(credentials).await {
            Ok(_) => Ok(()),
            Err(ApiError::Status {
                status: 400,
                detail,
                ..
            }) => Err(AuthError::SignupRejected(detail)),
            Err(e) => Err(e.into()),
        }
    }

    /// Signs in and, on success, publishes the authenticated state.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] when the server answers
    /// 401, or the underlying API error otherwise. The state is left
    /// untouched on failure.
    pub async fn login(&self, credentials: &Credentials) -> AuthResult<()> {
        match self.api.login(credentials).await {
            Ok(_) => {
                info!(username = %credentials.username, "signed in");
                self.set_state(AuthState::authenticated(credentials.username.clone()));
                Ok(())
            }
            Err(e) if e.is_unauthorized() => Err(AuthError::InvalidCredentials),
            Err(e) => Err(e.into()),
        }
    }

    /// Signs out and publishes the anonymous state.
    ///
    /// # Errors
    ///
    /// Returns the underlying API error when the server call fails; the
    /// state is left untouched in that case so the caller can retry.
    pub async fn logout(&self) -> AuthResult<()> {
        self.api.logout().await?;
        info!("signed out");
        self.set_state(AuthState::Anonymous);
        Ok(())
    }

    /// Revalidates the session against the backend.
    ///
    /// A 401 means the session is gone: the state transitions to
    /// anonymous. Transport-level failures leave the state untouched so a
    /// network blip does not sign the user out.
    ///
    /// # Errors
    ///
    /// Returns the underlying API error for failures other than 401.
    pub async fn refresh(&self) -> AuthResult<()> {
        match self.api.auth_check().await {
            Ok(check) => {
                self.set_state(AuthState::authenticated(check.username));
                Ok(())
            }
            Err(e) if e.is_unauthorized() => {
                if self.is_authenticated() {
                    warn!("session expired, signing out locally");
                }
                self.set_state(AuthState::Anonymous);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Publishes `next` if it differs from the current state.
    fn set_state(&self, next: AuthState) {
        self.state.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }
}
