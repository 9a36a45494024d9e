//! Bearer token storage.
//!
//! The token returned at login is persisted so that it survives restarts.
//! Presence of a token is the only notion of "authenticated": there is no
//! local expiry check, the server signals invalidity with a 401.

use crate::errors::TokenStoreError;
use std::path::Path;
use std::sync::Mutex;

/// Tree holding one token per API origin.
const TOKENS_TREE: &str = "auth_tokens";

// ============================================================================
// Token Store Interface
// ============================================================================

/// Narrow capability handed to everything that needs credentials.
pub trait TokenStore: Send + Sync {
    fn get_token(&self) -> Option<String>;

    fn set_token(&self, token: &str) -> Result<(), TokenStoreError>;

    fn clear(&self) -> Result<(), TokenStoreError>;

    fn is_authenticated(&self) -> bool {
        self.get_token().is_some()
    }

    /// Value for the `Authorization` header, or `None` when logged out.
    fn auth_header(&self) -> Option<String> {
        self.get_token().map(|t| format!("Bearer {}", t))
    }
}

// ============================================================================
// Sled-backed Store
// ============================================================================

/// Durable token storage keyed by API origin.
pub struct SledTokenStore {
    tree: sled::Tree,
    origin: String,
}

impl SledTokenStore {
    /// Open (or create) the token database at `path`.
    pub fn open(path: impl AsRef<Path>, origin: &str) -> Result<Self, TokenStoreError> {
        let db = sled::open(path)?;
        Self::with_db(&db, origin)
    }

    pub fn with_db(db: &sled::Db, origin: &str) -> Result<Self, TokenStoreError> {
        let tree = db.open_tree(TOKENS_TREE)?;
        Ok(Self {
            tree,
            origin: origin.to_string(),
        })
    }

    fn read(&self) -> Result<Option<String>, TokenStoreError> {
        match self.tree.get(self.origin.as_bytes())? {
            Some(bytes) => String::from_utf8(bytes.to_vec())
                .map(Some)
                .map_err(|_| TokenStoreError::Corrupt),
            None => Ok(None),
        }
    }
}

impl TokenStore for SledTokenStore {
    fn get_token(&self) -> Option<String> {
        match self.read() {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                log::warn!("Cannot read stored token: {}", e);
                None
            }
        }
    }

    fn set_token(&self, token: &str) -> Result<(), TokenStoreError> {
        self.tree.insert(self.origin.as_bytes(), token.as_bytes())?;
        self.tree.flush()?;
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        self.tree.remove(self.origin.as_bytes())?;
        self.tree.flush()?;
        Ok(())
    }
}

// ============================================================================
// In-memory Store
// ============================================================================

/// Non-durable store, for embedding and tests.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            token: Mutex::new(Some(token.to_string())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get_token(&self) -> Option<String> {
        let guard = self.token.lock().unwrap_or_else(|p| p.into_inner());
        guard.clone().filter(|t| !t.is_empty())
    }

    fn set_token(&self, token: &str) -> Result<(), TokenStoreError> {
        let mut guard = self.token.lock().unwrap_or_else(|p| p.into_inner());
        *guard = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        let mut guard = self.token.lock().unwrap_or_else(|p| p.into_inner());
        *guard = None;
        Ok(())
    }
}
