//! Session state machine.
//!
//! `Unknown -> CheckingAuth -> {Authenticated, Unauthenticated}`, then
//! `Authenticated <-> Unauthenticated` via login/register and logout.
//! The handle is `Clone` and process-wide: one instance is wired at
//! startup and passed to whatever needs it.

mod secret;
pub mod store;

pub use secret::SecureString;
pub use store::{FileSessionStore, MemorySessionStore, SessionStore, StorageError, StoredSession};

use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;

use crate::api::types::User;
use crate::api::{ApiClient, ApiError};

/// Where the session state machine currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// The startup bootstrap has not finished yet.
    CheckingAuth,
    Authenticated,
    Unauthenticated,
}

/// Failure result of a login or register call. Never panics upward;
/// transport and server failures both land here.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The server rejected the request, or it never reached the server.
    /// The message is the server-provided one where available.
    #[error("{0}")]
    Rejected(String),

    /// The auth call succeeded but the session could not be persisted.
    /// In-memory state is left untouched.
    #[error("failed to store session: {0}")]
    Storage(#[from] StorageError),
}

struct SessionState {
    token: Option<SecureString>,
    user: Option<User>,
    is_loading: bool,
    is_checking_auth: bool,
}

/// Process-wide session handle. Clones share one underlying state.
#[derive(Clone)]
pub struct Session {
    inner: Arc<RwLock<SessionState>>,
    api: Arc<ApiClient>,
    store: Arc<dyn SessionStore>,
}

impl Session {
    pub fn new(api: Arc<ApiClient>, store: Arc<dyn SessionStore>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(SessionState {
                token: None,
                user: None,
                is_loading: false,
                is_checking_auth: true,
            })),
            api,
            store,
        }
    }

    /// One-shot startup bootstrap: restore the session from durable
    /// storage.
    ///
    /// A missing or unreadable store means signed out, never an error
    /// to the caller. Unconditionally ends with `is_checking_auth`
    /// false so the initial render is never gated forever.
    pub async fn check_auth(&self) {
        let restored = match self.store.load() {
            Ok(stored) => stored,
            Err(err) => {
                tracing::warn!(error = %err, "auth check failed, treating as signed out");
                None
            }
        };

        let mut state = self.inner.write();
        match restored {
            Some(stored) => {
                state.token = Some(SecureString::new(stored.token));
                state.user = Some(stored.user);
            }
            None => {
                state.token = None;
                state.user = None;
            }
        }
        state.is_checking_auth = false;
    }

    /// Create an account and sign in.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<(), AuthError> {
        self.set_loading(true);
        let _loading = scopeguard::guard((), |()| self.set_loading(false));

        let auth = self
            .api
            .register(username, email, password)
            .await
            .map_err(|err| self.auth_failure("register", err))?;
        self.adopt(auth.token, auth.user)
    }

    /// Sign in with existing credentials.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), AuthError> {
        self.set_loading(true);
        let _loading = scopeguard::guard((), |()| self.set_loading(false));

        let auth = self
            .api
            .login(email, password)
            .await
            .map_err(|err| self.auth_failure("login", err))?;
        self.adopt(auth.token, auth.user)
    }

    /// Clear the persisted session, then the in-memory one. Succeeds
    /// when nothing was stored.
    pub async fn logout(&self) -> Result<(), AuthError> {
        self.store.clear()?;
        let mut state = self.inner.write();
        state.token = None;
        state.user = None;
        Ok(())
    }

    pub fn phase(&self) -> Phase {
        let state = self.inner.read();
        if state.is_checking_auth {
            Phase::CheckingAuth
        } else if state.token.is_some() && state.user.is_some() {
            Phase::Authenticated
        } else {
            Phase::Unauthenticated
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.phase() == Phase::Authenticated
    }

    pub fn is_loading(&self) -> bool {
        self.inner.read().is_loading
    }

    pub fn is_checking_auth(&self) -> bool {
        self.inner.read().is_checking_auth
    }

    pub fn token(&self) -> Option<SecureString> {
        self.inner.read().token.clone()
    }

    pub fn user(&self) -> Option<User> {
        self.inner.read().user.clone()
    }

    /// Persist, then adopt in memory. Token and user are set together;
    /// a persistence failure leaves both untouched.
    fn adopt(&self, token: String, user: User) -> Result<(), AuthError> {
        self.store.save(&StoredSession {
            token: token.clone(),
            user: user.clone(),
        })?;

        let mut state = self.inner.write();
        state.token = Some(SecureString::new(token));
        state.user = Some(user);
        Ok(())
    }

    fn auth_failure(&self, operation: &'static str, err: ApiError) -> AuthError {
        tracing::warn!(operation, error = %err, "auth request failed");
        AuthError::Rejected(err.user_message())
    }

    fn set_loading(&self, value: bool) {
        self.inner.write().is_loading = value;
    }
}
