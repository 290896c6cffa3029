//! Admin session token.

use std::sync::Arc;

use tracing::warn;
use zeroize::Zeroizing;

use crate::storage::{KeyValueStore, StorageError, TOKEN_KEY};

/// Opaque token issued by the backend on login, kept in its own slot.
#[derive(Debug, Clone)]
pub struct SessionStore {
    storage: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    /// Current token, if any. An unreadable slot counts as logged out.
    #[must_use]
    pub fn token(&self) -> Option<Zeroizing<String>> {
        match self.storage.get(TOKEN_KEY) {
            Ok(token) => token
                .filter(|token| !token.trim().is_empty())
                .map(Zeroizing::new),
            Err(error) => {
                warn!(%error, "session token is unreadable");
                None
            }
        }
    }

    /// Check whether a token is present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Store a freshly issued token.
    ///
    /// # Errors
    ///
    /// Returns an error when the token slot cannot be written.
    pub fn save(&self, token: &str) -> Result<(), StorageError> {
        self.storage.set(TOKEN_KEY, token)
    }

    /// Forget the token.
    ///
    /// # Errors
    ///
    /// Returns an error when the token slot cannot be removed.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.storage.remove(TOKEN_KEY)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::storage::MemoryStore;

    use super::*;

    #[test]
    fn token_lifecycle() -> TestResult {
        let session = SessionStore::new(Arc::new(MemoryStore::new()));

        assert!(!session.is_authenticated());

        session.save("abc123")?;
        assert_eq!(session.token().as_deref().map(String::as_str), Some("abc123"));

        session.clear()?;
        assert!(session.token().is_none());

        Ok(())
    }

    #[test]
    fn blank_token_is_not_a_session() -> TestResult {
        let session = SessionStore::new(Arc::new(MemoryStore::new()));

        session.save("  ")?;

        assert!(!session.is_authenticated());

        Ok(())
    }
}
