//! Session store.
//!
//! Holds the current authentication status and user identity. This is a
//! mock/local-only session layer: identity is minted client-side at sign-in,
//! the bearer token is persisted to browser storage, and nothing is
//! cryptographically validated. A 401 from the service is the only thing
//! that invalidates a session early.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

/// Prefix for locally-minted bearer tokens.
const TOKEN_PREFIX: &str = "mock-jwt-";

/// Browser storage key for the persisted token.
#[cfg(target_arch = "wasm32")]
const STORAGE_KEY: &str = "taskboard_session_token";

/// Session lifetime from sign-in (or restore).
const SESSION_HOURS: i64 = 24;

/// Signed-in user identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
}

/// Client-held record of the authenticated user and bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user: User,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Authentication status exposed to the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthStatus {
    /// Persisted state not checked yet.
    #[default]
    Loading,
    Authenticated,
    Unauthenticated,
}

pub struct SessionStore {
    status: AuthStatus,
    session: Option<Session>,
    /// Shared with the REST client, which reads it per-request for the
    /// Authorization header.
    token: Arc<Mutex<Option<String>>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            status: AuthStatus::Loading,
            session: None,
            token: Arc::new(Mutex::new(None)),
        }
    }

    /// Handle the REST client holds for the bearer token.
    pub fn token_handle(&self) -> Arc<Mutex<Option<String>>> {
        self.token.clone()
    }

    pub fn status(&self) -> AuthStatus {
        self.status
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.status == AuthStatus::Authenticated
    }

    /// Restore a session from persisted storage, resolving the initial
    /// `Loading` status. A stored token is trusted as-is; identity is
    /// derived from it the same way sign-in minted it.
    pub fn restore(&mut self) {
        if let Some(token) = read_stored_token() {
            if let Some(session) = session_from_token(&token, Utc::now()) {
                tracing::info!(user = %session.user.id, "restored session from storage");
                self.install(session);
                return;
            }
        }
        self.status = AuthStatus::Unauthenticated;
    }

    /// Mock sign-in: accepts any credentials, mints a local identity and
    /// token, and persists the token for the next page load.
    pub fn sign_in(&mut self, email: &str, _password: &str) {
        let user_id = Uuid::new_v4().to_string();
        let name = email.split('@').next().filter(|n| !n.is_empty());
        let session = Session {
            user: User {
                id: user_id.clone(),
                email: email.to_string(),
                name: name.map(str::to_string),
            },
            token: format!("{TOKEN_PREFIX}{user_id}"),
            expires_at: Utc::now() + Duration::hours(SESSION_HOURS),
        };
        tracing::info!(user = %session.user.id, "signed in");
        #[cfg(target_arch = "wasm32")]
        write_stored_token(&session.token);
        self.install(session);
    }

    /// Clear the session and the persisted token.
    pub fn sign_out(&mut self) {
        tracing::info!("signed out");
        self.clear();
    }

    /// Drop the session after the server rejected its token.
    pub fn expire(&mut self) {
        tracing::warn!("session rejected by server, signing out");
        self.clear();
    }

    /// Per-frame check: local expiry also ends the session. Returns true
    /// when the session was dropped this call.
    pub fn tick(&mut self, now: DateTime<Utc>) -> bool {
        if let Some(session) = &self.session {
            if session.is_expired(now) {
                tracing::info!("session expired");
                self.clear();
                return true;
            }
        }
        false
    }

    fn install(&mut self, session: Session) {
        if let Ok(mut guard) = self.token.lock() {
            *guard = Some(session.token.clone());
        }
        self.session = Some(session);
        self.status = AuthStatus::Authenticated;
    }

    fn clear(&mut self) {
        if let Ok(mut guard) = self.token.lock() {
            *guard = None;
        }
        self.session = None;
        self.status = AuthStatus::Unauthenticated;
        #[cfg(target_arch = "wasm32")]
        remove_stored_token();
    }
}

/// Rebuild a session from a persisted token. Only tokens this client minted
/// (carrying [`TOKEN_PREFIX`]) are accepted; the user id is whatever follows
/// the prefix. Email and display name are placeholders until a real identity
/// service exists.
fn session_from_token(token: &str, now: DateTime<Utc>) -> Option<Session> {
    let user_id = token.strip_prefix(TOKEN_PREFIX)?;
    if user_id.is_empty() {
        return None;
    }
    Some(Session {
        user: User {
            id: user_id.to_string(),
            email: "user@example.com".to_string(),
            name: Some("User".to_string()),
        },
        token: token.to_string(),
        expires_at: now + Duration::hours(SESSION_HOURS),
    })
}

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

#[cfg(target_arch = "wasm32")]
fn read_stored_token() -> Option<String> {
    local_storage().and_then(|s| s.get_item(STORAGE_KEY).ok().flatten())
}

/// No persisted storage outside the browser; native sessions live only as
/// long as the process.
#[cfg(not(target_arch = "wasm32"))]
fn read_stored_token() -> Option<String> {
    None
}

#[cfg(target_arch = "wasm32")]
fn write_stored_token(token: &str) {
    if let Some(storage) = local_storage() {
        let _ = storage.set_item(STORAGE_KEY, token);
    }
}

#[cfg(target_arch = "wasm32")]
fn remove_stored_token() {
    if let Some(storage) = local_storage() {
        let _ = storage.remove_item(STORAGE_KEY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_in_populates_session_and_token_handle() {
        let mut store = SessionStore::new();
        store.sign_in("ada@example.com", "pw");

        assert!(store.is_authenticated());
        let session = store.session().expect("session");
        assert_eq!(session.user.email, "ada@example.com");
        assert_eq!(session.user.name.as_deref(), Some("ada"));
        assert!(session.token.starts_with(TOKEN_PREFIX));

        let handle = store.token_handle();
        let token = handle.lock().expect("lock").clone();
        assert_eq!(token.as_deref(), Some(session.token.as_str()));
    }

    #[test]
    fn test_sign_out_clears_session_and_token_handle() {
        let mut store = SessionStore::new();
        store.sign_in("ada@example.com", "pw");
        store.sign_out();

        assert_eq!(store.status(), AuthStatus::Unauthenticated);
        assert!(store.session().is_none());
        assert!(store.token_handle().lock().expect("lock").is_none());
    }

    #[test]
    fn test_session_from_token_round_trip() {
        let now = Utc::now();
        let session = session_from_token("mock-jwt-abc-123", now).expect("session");
        assert_eq!(session.user.id, "abc-123");
        assert_eq!(session.token, "mock-jwt-abc-123");
        assert_eq!(session.expires_at, now + Duration::hours(SESSION_HOURS));
    }

    #[test]
    fn test_session_from_token_rejects_foreign_tokens() {
        let now = Utc::now();
        assert!(session_from_token("mock-jwt-", now).is_none());
        assert!(session_from_token("eyJhbGciOi", now).is_none());
    }

    #[test]
    fn test_tick_expires_stale_session() {
        let mut store = SessionStore::new();
        store.sign_in("ada@example.com", "pw");
        let expiry = store.session().expect("session").expires_at;

        assert!(!store.tick(expiry - Duration::minutes(1)));
        assert!(store.is_authenticated());

        assert!(store.tick(expiry));
        assert_eq!(store.status(), AuthStatus::Unauthenticated);
        assert!(store.token_handle().lock().expect("lock").is_none());
    }
}
