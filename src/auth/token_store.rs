use std::sync::Arc;

use crate::utils::storage::{KeyValueStore, StorageKey};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TokenKey {
    Access,
    Refresh,
}

impl TokenKey {
    fn storage_key(self) -> StorageKey {
        match self {
            TokenKey::Access => StorageKey::AccessToken,
            TokenKey::Refresh => StorageKey::RefreshToken,
        }
    }
}

/// Access/refresh bearer pair. Both or neither are held, and neither is empty.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    access_token: String,
    refresh_token: String,
}

impl Credentials {
    /// `None` unless both tokens are non-empty.
    pub fn new(access_token: String, refresh_token: String) -> Option<Self> {
        if access_token.is_empty() || refresh_token.is_empty() {
            return None;
        }
        Some(Self {
            access_token,
            refresh_token,
        })
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn refresh_token(&self) -> &str {
        &self.refresh_token
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

/// What storage held at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredTokens {
    Empty,
    Complete(Credentials),
    /// One token without the other.
    Partial,
}

/// Source of truth for bearer tokens across restarts.
#[derive(Clone)]
pub struct TokenStore {
    backend: Arc<dyn KeyValueStore>,
}

impl TokenStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    pub fn get(&self, key: TokenKey) -> Option<String> {
        self.backend
            .get(key.storage_key())
            .filter(|value| !value.is_empty())
    }

    pub fn set(&self, key: TokenKey, value: &str) {
        self.backend.set(key.storage_key(), value);
    }

    pub fn delete(&self, key: TokenKey) {
        self.backend.delete(key.storage_key());
    }

    pub fn load(&self) -> StoredTokens {
        match (self.get(TokenKey::Access), self.get(TokenKey::Refresh)) {
            (Some(access_token), Some(refresh_token)) => Credentials::new(access_token, refresh_token)
                .map_or(StoredTokens::Partial, StoredTokens::Complete),
            (None, None) => StoredTokens::Empty,
            _ => StoredTokens::Partial,
        }
    }

    /// Overwrites whatever pair was stored before.
    pub fn save(&self, credentials: &Credentials) {
        self.set(TokenKey::Access, &credentials.access_token);
        self.set(TokenKey::Refresh, &credentials.refresh_token);
    }

    pub fn clear(&self) {
        self.delete(TokenKey::Access);
        self.delete(TokenKey::Refresh);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::storage::{MemoryStore, NullStore};

    fn creds(a: &str, r: &str) -> Credentials {
        Credentials::new(a.into(), r.into()).unwrap()
    }

    #[test]
    fn credentials_need_two_non_empty_tokens() {
        assert!(Credentials::new(String::new(), "r".into()).is_none());
        assert!(Credentials::new("a".into(), String::new()).is_none());
        assert_eq!(creds("a", "r").access_token(), "a");
    }

    #[test]
    fn save_overwrites_and_clear_removes() {
        let store = TokenStore::new(Arc::new(MemoryStore::new()));
        assert_eq!(store.load(), StoredTokens::Empty);

        store.save(&creds("a1", "r1"));
        store.save(&creds("a2", "r2"));
        assert_eq!(store.load(), StoredTokens::Complete(creds("a2", "r2")));

        store.clear();
        assert_eq!(store.load(), StoredTokens::Empty);
    }

    #[test]
    fn single_token_is_partial() {
        let store = TokenStore::new(Arc::new(MemoryStore::new()));
        store.set(TokenKey::Access, "a1");
        assert_eq!(store.load(), StoredTokens::Partial);
    }

    #[test]
    fn empty_value_counts_as_absent() {
        let store = TokenStore::new(Arc::new(MemoryStore::new()));
        store.set(TokenKey::Access, "");
        assert_eq!(store.get(TokenKey::Access), None);
    }

    #[test]
    fn unavailable_storage_reads_empty() {
        let store = TokenStore::new(Arc::new(NullStore));
        store.save(&creds("a", "r"));
        assert_eq!(store.load(), StoredTokens::Empty);
    }

    #[test]
    fn debug_hides_tokens() {
        let shown = format!("{:?}", creds("secret-a", "secret-r"));
        assert!(!shown.contains("secret"));
    }
}
