//! The session store: single source of truth for authentication state.
//!
//! All writes go through the store's own operations; everything else reads
//! snapshots or subscribes to change notifications. Persistence goes through
//! `SessionStorage` so the token/user pair is never half-written.

use tokio::sync::watch;

use eventual_core::error::{EventualError, EventualResult};
use eventual_core::session::{Session, SessionPhase};
use eventual_core::user::User;

use crate::api::ApiClient;
use crate::storage::SessionStorage;

/// Error recorded on the session after a failed verification.
pub const SESSION_EXPIRED: &str = "Sesión expirada";

pub struct SessionStore {
    storage: SessionStorage,
    state: watch::Sender<Session>,
}

impl SessionStore {
    /// Hydrate from persisted storage. A persisted pair starts out
    /// `Anonymous` until `initialize` verifies it with the backend.
    pub fn new(storage: SessionStorage) -> Self {
        let initial = match storage.load() {
            Some((token, user)) => Session {
                phase: SessionPhase::Anonymous,
                token: Some(token),
                user: Some(user),
                error: None,
            },
            None => Session::anonymous(),
        };

        let (state, _) = watch::channel(initial);
        SessionStore { storage, state }
    }

    /// Current session snapshot.
    pub fn snapshot(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Subscribe to session changes.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    /// Token for the gateway's Authorization header, if any.
    pub fn token(&self) -> Option<String> {
        self.state.borrow().token.clone()
    }

    fn set(&self, session: Session) {
        self.state.send_replace(session);
    }

    /// Startup verification of a persisted session.
    ///
    /// No persisted pair: straight to `Anonymous`, not loading. Persisted
    /// pair: `Authenticating` while the backend verifies the token, then
    /// `Authenticated` with the stored identity, or a cleared session with
    /// the expiry error.
    pub async fn initialize(&self, api: &ApiClient) {
        let Some((token, user)) = self.storage.load() else {
            self.set(Session::anonymous());
            return;
        };

        self.set(Session {
            phase: SessionPhase::Authenticating,
            token: Some(token.clone()),
            user: Some(user.clone()),
            error: None,
        });

        match api.verify().await {
            Ok(()) => {
                tracing::debug!(email = %user.email, "persisted session verified");
                self.set(Session::authenticated(token, user));
            }
            Err(err) => {
                tracing::warn!("token verification failed: {err}");
                let _ = self.storage.clear();
                self.set(Session::failed(SESSION_EXPIRED));
            }
        }
    }

    /// Log in with the token and URL-decoded JSON user payload from the
    /// OAuth callback. Persists the pair together, then transitions to
    /// `Authenticated`. A malformed payload fails with an auth error and
    /// leaves the session untouched.
    pub fn login(&self, token: &str, user_payload: &str) -> EventualResult<User> {
        let user: User = serde_json::from_str(user_payload)
            .map_err(|e| EventualError::Auth(format!("Datos de usuario inválidos: {}", e)))?;

        if user.email.trim().is_empty() {
            return Err(EventualError::Auth(
                "Datos de usuario inválidos: falta el email".to_string(),
            ));
        }

        self.storage.store(token, &user)?;
        self.set(Session::authenticated(token, user.clone()));

        tracing::info!(email = %user.email, "logged in");
        Ok(user)
    }

    /// Log out. The backend call is best-effort; local state is always
    /// cleared.
    pub async fn logout(&self, api: &ApiClient) {
        if self.snapshot().is_authenticated() {
            if let Err(err) = api.logout().await {
                tracing::warn!("logout request failed: {err}");
            }
        }

        if let Err(err) = self.storage.clear() {
            tracing::warn!("failed to clear persisted session: {err}");
        }
        self.set(Session::anonymous());
    }

    /// Request a fresh token, keeping the current identity. On failure the
    /// session is torn down and the error returned.
    pub async fn refresh(&self, api: &ApiClient) -> EventualResult<String> {
        let user = self
            .snapshot()
            .user
            .ok_or_else(|| EventualError::Auth("No hay sesión activa".to_string()))?;

        match api.refresh_token().await {
            Ok(token) => {
                self.storage.store(&token, &user)?;
                self.set(Session::authenticated(token.clone(), user));
                Ok(token)
            }
            Err(err) => {
                tracing::warn!("token refresh failed: {err}");
                self.logout(api).await;
                Err(err)
            }
        }
    }

    /// Re-fetch the user profile. On failure the session is left unchanged
    /// and the error surfaced to the caller.
    pub async fn get_profile(&self, api: &ApiClient) -> EventualResult<User> {
        let token = self
            .snapshot()
            .token
            .ok_or_else(|| EventualError::Auth("No hay sesión activa".to_string()))?;

        let user = api.get_profile().await?;
        self.storage.store(&token, &user)?;
        self.set(Session::authenticated(token, user.clone()));
        Ok(user)
    }

    /// Forced teardown after a 401: clear persisted state and drop to
    /// `Anonymous`. Used by the gateway; never calls the backend.
    pub fn force_clear(&self) {
        if let Err(err) = self.storage.clear() {
            tracing::warn!("failed to clear persisted session: {err}");
        }
        self.set(Session::failed(SESSION_EXPIRED));
    }
}
