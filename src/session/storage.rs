//! Read-only session storage seen by navigation guards.

use std::collections::HashMap;

/// Keys the portal stores in session-scoped storage.
pub mod keys {
    /// Opaque credential issued by the login flow.
    pub const SA_TOKEN: &str = "saToken";

    /// Role tag stored alongside the token.
    pub const ROLE: &str = "role";
}

/// Session-scoped key/value storage, read-only from the guard's side.
///
/// A missing key and an empty value are both reported as `None`.
pub trait SessionStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Option<String>;
}

/// Returns the stored role tag, if any.
pub fn get_role(storage: &dyn SessionStorage) -> Option<String> {
    storage.get_item(keys::ROLE)
}

/// Returns the session credential, if any.
pub fn get_token(storage: &dyn SessionStorage) -> Option<String> {
    storage.get_item(keys::SA_TOKEN)
}

/// In-memory storage for guard tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySession {
    items: HashMap<String, String>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    /// An anonymous session.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A session holding the given credential.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self::default().with_item(keys::SA_TOKEN, token)
    }

    pub fn with_item(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.items.insert(key.into(), value.into());
        self
    }
}

impl SessionStorage for MemorySession {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).filter(|v| !v.is_empty()).cloned()
    }
}
