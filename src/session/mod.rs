pub mod storage;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use storage::{FileStorage, LocalStorage, MemoryStorage, StorageError, TOKEN_KEY, USER_KEY};

/// Identity returned by the remote on successful authentication.
/// Only `username` is interpreted here; everything else rides along.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: None,
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageOp {
    Read,
    Write,
    Remove,
}

/// Non-fatal durable-storage failure; in-memory session state stays authoritative
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageWarning {
    pub key: &'static str,
    pub operation: StorageOp,
    pub message: String,
}

impl StorageWarning {
    fn new(key: &'static str, operation: StorageOp, message: impl Into<String>) -> Self {
        let warning = Self {
            key,
            operation,
            message: message.into(),
        };
        tracing::warn!(key, operation = ?operation, "session storage: {}", warning.message);
        warning
    }
}

/// Authenticated identity plus credential, mirrored to durable storage.
///
/// Mutations never fail: storage errors come back as [`StorageWarning`]s
/// and the in-memory value is updated regardless.
#[derive(Debug)]
pub struct SessionState {
    storage: Arc<dyn LocalStorage>,
    user: Option<User>,
    token: Option<String>,
}

impl SessionState {
    /// Build the session from whatever durable storage holds.
    ///
    /// Unreadable storage and a malformed `user` entry both hydrate as absent.
    pub fn hydrate(storage: Arc<dyn LocalStorage>) -> Self {
        let token = match storage.get_item(TOKEN_KEY) {
            Ok(token) => token,
            Err(e) => {
                StorageWarning::new(TOKEN_KEY, StorageOp::Read, e.to_string());
                None
            }
        };

        let user = match storage.get_item(USER_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    StorageWarning::new(USER_KEY, StorageOp::Read, format!("discarding malformed user: {}", e));
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                StorageWarning::new(USER_KEY, StorageOp::Read, e.to_string());
                None
            }
        };

        tracing::debug!(
            authenticated = user.is_some(),
            has_token = token.is_some(),
            "session hydrated"
        );

        Self { storage, user, token }
    }

    /// Fresh session over empty in-memory storage
    pub fn in_memory() -> Self {
        Self::hydrate(Arc::new(MemoryStorage::new()))
    }

    pub fn current_user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// The single signal navigation consults; token presence is not checked
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Handle to the backing storage, for read-only consumers like the transport
    pub fn storage(&self) -> Arc<dyn LocalStorage> {
        Arc::clone(&self.storage)
    }

    pub fn set_user(&mut self, user: User) -> Vec<StorageWarning> {
        let mut warnings = Vec::new();

        match serde_json::to_string(&user) {
            Ok(raw) => {
                if let Err(e) = self.storage.set_item(USER_KEY, &raw) {
                    warnings.push(StorageWarning::new(USER_KEY, StorageOp::Write, e.to_string()));
                }
            }
            Err(e) => warnings.push(StorageWarning::new(USER_KEY, StorageOp::Write, e.to_string())),
        }

        tracing::info!(username = %user.username, "session user set");
        self.user = Some(user);
        warnings
    }

    pub fn set_token(&mut self, token: impl Into<String>) -> Vec<StorageWarning> {
        let token = token.into();
        let mut warnings = Vec::new();

        if let Err(e) = self.storage.set_item(TOKEN_KEY, &token) {
            warnings.push(StorageWarning::new(TOKEN_KEY, StorageOp::Write, e.to_string()));
        }

        self.token = Some(token);
        warnings
    }

    /// Record a successful authentication: credential first, then identity
    pub fn sign_in(&mut self, user: User, token: impl Into<String>) -> Vec<StorageWarning> {
        let mut warnings = self.set_token(token);
        warnings.extend(self.set_user(user));
        warnings
    }

    /// Forget identity and credential, in memory and durably
    pub fn clear(&mut self) -> Vec<StorageWarning> {
        let mut warnings = Vec::new();

        for key in [USER_KEY, TOKEN_KEY] {
            if let Err(e) = self.storage.remove_item(key) {
                warnings.push(StorageWarning::new(key, StorageOp::Remove, e.to_string()));
            }
        }

        self.user = None;
        self.token = None;
        tracing::info!("session cleared");
        warnings
    }

    /// Clear after the remote rejected the credential
    pub fn invalidate(&mut self, reason: &str) -> Vec<StorageWarning> {
        tracing::warn!(reason, "session invalidated");
        self.clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Storage that refuses every operation
    #[derive(Debug)]
    struct BrokenStorage;

    impl LocalStorage for BrokenStorage {
        fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("disabled".into()))
        }
        fn set_item(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("quota exceeded".into()))
        }
        fn remove_item(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("disabled".into()))
        }
    }

    #[test]
    fn test_set_user_survives_reload() {
        let storage: Arc<dyn LocalStorage> = Arc::new(MemoryStorage::new());
        let mut session = SessionState::hydrate(Arc::clone(&storage));
        let user = User::new("alice");

        assert!(session.set_user(user.clone()).is_empty());

        let reloaded = SessionState::hydrate(storage);
        assert_eq!(reloaded.current_user(), Some(&user));
    }

    #[test]
    fn test_clear_survives_reload() {
        let storage: Arc<dyn LocalStorage> = Arc::new(MemoryStorage::new());
        let mut session = SessionState::hydrate(Arc::clone(&storage));
        session.sign_in(User::new("alice"), "tok");
        session.clear();

        let reloaded = SessionState::hydrate(storage);
        assert_eq!(reloaded.current_user(), None);
        assert_eq!(reloaded.token(), None);
    }

    #[test]
    fn test_sign_in_persists_token_key() {
        let storage: Arc<dyn LocalStorage> = Arc::new(MemoryStorage::new());
        let mut session = SessionState::hydrate(Arc::clone(&storage));

        session.sign_in(User::new("bob"), "secret");

        assert_eq!(storage.get_item(TOKEN_KEY).unwrap().as_deref(), Some("secret"));
        let raw = storage.get_item(USER_KEY).unwrap().unwrap();
        assert_eq!(serde_json::from_str::<User>(&raw).unwrap().username, "bob");
    }

    #[test]
    fn test_persistence_failure_is_a_warning() {
        let mut session = SessionState::hydrate(Arc::new(BrokenStorage));
        assert!(!session.is_authenticated());

        let warnings = session.sign_in(User::new("carol"), "tok");

        assert_eq!(warnings.len(), 2);
        assert!(warnings.iter().all(|w| w.operation == StorageOp::Write));
        assert_eq!(session.current_user().map(|u| u.username.as_str()), Some("carol"));
        assert_eq!(session.token(), Some("tok"));

        let warnings = session.clear();
        assert_eq!(warnings.len(), 2);
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_malformed_user_hydrates_as_absent() {
        let storage: Arc<dyn LocalStorage> = Arc::new(MemoryStorage::new());
        storage.set_item(USER_KEY, "[object Object]").unwrap();
        storage.set_item(TOKEN_KEY, "tok").unwrap();

        let session = SessionState::hydrate(storage);

        assert!(!session.is_authenticated());
        assert_eq!(session.token(), Some("tok"));
    }

    #[test]
    fn test_token_alone_is_not_a_session() {
        let mut session = SessionState::in_memory();
        session.set_token("tok");
        assert!(!session.is_authenticated());
    }
}
