//! In-memory account store with bcrypt password hashes.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

/// Role handed to every self-registered account.
pub const DEFAULT_ROLE: &str = "student";

/// A registered user.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: u64,
    pub username: String,
    pub role: String,
    password_hash: String,
}

/// Error type for account operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("{0} must not be empty")]
    MissingField(&'static str),

    #[error("user already exists")]
    AlreadyExists,

    #[error("user does not exist or password is wrong")]
    InvalidCredentials,

    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
}

/// Username → account.
#[derive(Debug)]
pub struct AccountStore {
    accounts: DashMap<String, Account>,
    next_id: AtomicU64,
    cost: u32,
    /// Hash checked against when the username is unknown, so a miss costs
    /// the same as a wrong password.
    decoy_hash: OnceLock<Option<String>>,
}

impl Default for AccountStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AccountStore {
    pub fn new() -> Self {
        Self::with_cost(bcrypt::DEFAULT_COST)
    }

    /// Store using a specific bcrypt cost (tests use the minimum).
    pub fn with_cost(cost: u32) -> Self {
        Self {
            accounts: DashMap::new(),
            next_id: AtomicU64::new(1),
            cost,
            decoy_hash: OnceLock::new(),
        }
    }

    /// Create an account and return its id.
    pub fn register(&self, username: &str, password: &str) -> Result<u64, AccountError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AccountError::MissingField("username"));
        }
        if password.is_empty() {
            return Err(AccountError::MissingField("password"));
        }
        if self.accounts.contains_key(username) {
            return Err(AccountError::AlreadyExists);
        }

        // Hash outside the shard lock; the entry check below settles races.
        let password_hash = bcrypt::hash(password, self.cost)?;

        match self.accounts.entry(username.to_string()) {
            Entry::Occupied(_) => Err(AccountError::AlreadyExists),
            Entry::Vacant(slot) => {
                let id = self.next_id.fetch_add(1, Ordering::Relaxed);
                slot.insert(Account {
                    id,
                    username: username.to_string(),
                    role: DEFAULT_ROLE.to_string(),
                    password_hash,
                });
                tracing::info!(username, id, "Account registered");
                Ok(id)
            }
        }
    }

    /// Check a username/password pair.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<Account, AccountError> {
        let Some(account) = self.accounts.get(username.trim()).map(|entry| entry.value().clone()) else {
            if let Some(hash) = self.decoy_hash() {
                let _ = bcrypt::verify(password, hash);
            }
            return Err(AccountError::InvalidCredentials);
        };

        if bcrypt::verify(password, &account.password_hash)? {
            Ok(account)
        } else {
            Err(AccountError::InvalidCredentials)
        }
    }

    fn decoy_hash(&self) -> Option<&str> {
        self.decoy_hash
            .get_or_init(|| bcrypt::hash("decoy", self.cost).ok())
            .as_deref()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> AccountStore {
        AccountStore::with_cost(4)
    }

    #[test]
    fn test_register_then_authenticate() {
        let store = store();
        let id = store.register("alice", "s3cret").unwrap();

        let account = store.authenticate("alice", "s3cret").unwrap();
        assert_eq!(account.id, id);
        assert_eq!(account.role, DEFAULT_ROLE);
        assert_ne!(account.password_hash, "s3cret");
    }

    #[test]
    fn test_duplicate_username() {
        let store = store();
        store.register("alice", "one").unwrap();
        assert!(matches!(store.register("alice", "two"), Err(AccountError::AlreadyExists)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_wrong_password_and_unknown_user() {
        let store = store();
        store.register("alice", "right").unwrap();
        assert!(matches!(
            store.authenticate("alice", "wrong"),
            Err(AccountError::InvalidCredentials)
        ));
        assert!(matches!(
            store.authenticate("bob", "right"),
            Err(AccountError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_unknown_user_still_runs_bcrypt() {
        let store = store();
        assert!(store.decoy_hash.get().is_none());

        assert!(matches!(
            store.authenticate("nobody", "pw"),
            Err(AccountError::InvalidCredentials)
        ));
        let decoy = store.decoy_hash.get().cloned().flatten().unwrap();
        assert!(decoy.starts_with("$2"));
        assert!(decoy.contains("$04$"));
    }

    #[test]
    fn test_empty_fields_rejected() {
        let store = store();
        assert!(matches!(store.register("  ", "pw"), Err(AccountError::MissingField("username"))));
        assert!(matches!(store.register("bob", ""), Err(AccountError::MissingField("password"))));
        assert!(store.is_empty());
    }

    #[test]
    fn test_ids_are_distinct() {
        let store = store();
        let a = store.register("a", "pw").unwrap();
        let b = store.register("b", "pw").unwrap();
        assert_ne!(a, b);
    }
}
