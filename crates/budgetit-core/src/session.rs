//! Authentication session state
//!
//! A [`Session`] is the single owner of "who is logged in". It is created
//! once at startup with [`Session::restore`], changes only through
//! `login`/`signup`/`logout`, and persists the backend cookie through a
//! [`SessionStore`] so separate CLI invocations share one login.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::api::ApiClient;
use crate::error::{Error, Result};
use crate::models::{Credentials, SignupRequest, User};

/// Contents of the session file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSession {
    pub cookie: String,
    #[serde(default)]
    pub user: Option<User>,
}

/// File-backed storage for the session cookie
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored session; a missing file is `Ok(None)`
    pub fn load(&self) -> Result<Option<StoredSession>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    pub fn save(&self, session: &StoredSession) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(session)?)?;
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Who is using the client
#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    Anonymous,
    Authenticated(User),
}

/// Explicit application session
#[derive(Debug)]
pub struct Session {
    api: ApiClient,
    store: SessionStore,
    state: AuthState,
}

impl Session {
    /// Start anonymous without touching the store
    pub fn anonymous(api: ApiClient, store: SessionStore) -> Self {
        Self {
            api,
            store,
            state: AuthState::Anonymous,
        }
    }

    /// Resume a stored session if the backend still accepts it
    ///
    /// Never fails: any problem leaves the session anonymous. A cookie the
    /// backend rejects is removed from the store; a network failure keeps it
    /// for the next attempt.
    pub async fn restore(api: ApiClient, store: SessionStore) -> Self {
        let mut session = Self::anonymous(api, store);

        let stored = match session.store.load() {
            Ok(Some(stored)) => stored,
            Ok(None) => return session,
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable session file");
                return session;
            }
        };

        session.api.set_cookie(Some(stored.cookie));
        match session.api.current_user().await {
            Ok(user) => {
                info!(user = %user.email, "Session restored");
                session.state = AuthState::Authenticated(user);
                session.persist();
            }
            Err(Error::Unauthenticated) => {
                info!("Stored session expired");
                session.api.set_cookie(None);
                if let Err(e) = session.store.clear() {
                    warn!(error = %e, "Failed to remove expired session file");
                }
            }
            Err(e) => {
                warn!(error = %e, "Could not verify stored session");
                session.api.set_cookie(None);
            }
        }

        session
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<User> {
        let credentials = Credentials {
            email: email.to_string(),
            password: password.to_string(),
        };
        let user = self.api.signin(&credentials).await?;
        info!(user = %user.email, "Signed in");
        Ok(self.become_authenticated(user))
    }

    pub async fn signup(&mut self, request: &SignupRequest) -> Result<User> {
        let user = self.api.signup(request).await?;
        info!(user = %user.email, "Signed up");
        Ok(self.become_authenticated(user))
    }

    /// End the session locally even if the backend call fails
    pub async fn logout(&mut self) -> Result<()> {
        if let Err(e) = self.api.logout().await {
            warn!(error = %e, "Backend logout failed");
        }
        self.api.set_cookie(None);
        self.state = AuthState::Anonymous;
        self.store.clear()?;
        info!("Signed out");
        Ok(())
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn user(&self) -> Option<&User> {
        match &self.state {
            AuthState::Authenticated(user) => Some(user),
            AuthState::Anonymous => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user().is_some()
    }

    pub fn require_user(&self) -> Result<&User> {
        self.user().ok_or(Error::Unauthenticated)
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    fn become_authenticated(&mut self, user: User) -> User {
        self.state = AuthState::Authenticated(user.clone());
        self.persist();
        user
    }

    /// Save the cookie; failure only costs the next invocation a login
    fn persist(&self) {
        let Some(cookie) = self.api.cookie() else {
            warn!("Backend did not issue a session cookie");
            return;
        };
        let stored = StoredSession {
            cookie,
            user: self.user().cloned(),
        };
        if let Err(e) = self.store.save(&stored) {
            warn!(error = %e, path = %self.store.path().display(), "Failed to save session");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: 1,
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            user_type: crate::models::UserType::Student,
        }
    }

    #[test]
    fn test_store_roundtrip_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("nested").join("session.json"));

        assert!(store.load().unwrap().is_none());

        let stored = StoredSession {
            cookie: "session=abc".to_string(),
            user: Some(sample_user()),
        };
        store.save(&stored).unwrap();
        assert_eq!(store.load().unwrap(), Some(stored));

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        // Clearing twice is fine
        store.clear().unwrap();
    }

    #[test]
    fn test_store_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();
        let store = SessionStore::new(&path);
        assert!(matches!(store.load(), Err(Error::Json(_))));
    }

    #[tokio::test]
    async fn test_restore_without_file_is_anonymous() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        let api = ApiClient::new("http://127.0.0.1:9/api");

        let session = Session::restore(api, store).await;
        assert_eq!(session.state(), &AuthState::Anonymous);
        assert!(matches!(session.require_user(), Err(Error::Unauthenticated)));
    }

    #[tokio::test]
    async fn test_restore_unreachable_keeps_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        store
            .save(&StoredSession {
                cookie: "session=abc".to_string(),
                user: None,
            })
            .unwrap();

        let api = ApiClient::new("http://127.0.0.1:9/api");
        let session = Session::restore(api, store.clone()).await;

        assert!(!session.is_authenticated());
        assert!(session.api().cookie().is_none());
        assert!(store.load().unwrap().is_some());
    }
}
