//! Server-side registry of issued session credentials.
//!
//! Session cookies vanish with the browser session without telling the
//! server, so every credential carries an issue time and lapses after the
//! store's TTL. Expired entries are dropped on lookup and by `purge_expired`.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use uuid::Uuid;

/// Lifetime of a credential when none is configured.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(12 * 60 * 60);

/// The account a credential was issued to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInfo {
    pub login_id: u64,
    pub role: String,
    pub issued_at: Instant,
}

/// Thread-safe token → account map.
#[derive(Clone)]
pub struct TokenStore {
    inner: Arc<DashMap<String, TokenInfo>>,
    ttl: Duration,
}

impl Default for TokenStore {
    fn default() -> Self {
        Self::with_ttl(DEFAULT_TOKEN_TTL)
    }
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a fresh credential for `login_id`.
    pub fn issue(&self, login_id: u64, role: &str) -> String {
        let token = Uuid::new_v4().simple().to_string();
        self.inner.insert(
            token.clone(),
            TokenInfo {
                login_id,
                role: role.to_owned(),
                issued_at: Instant::now(),
            },
        );
        tracing::debug!(login_id, active = self.inner.len(), "Session token issued");
        token
    }

    /// The account behind `token`, unless it is unknown or expired.
    pub fn lookup(&self, token: &str) -> Option<TokenInfo> {
        let info = self.inner.get(token).map(|entry| entry.value().clone())?;
        if self.is_expired(&info) {
            self.inner.remove_if(token, |_, info| self.is_expired(info));
            return None;
        }
        Some(info)
    }

    /// Revoke a credential. Returns whether it was known.
    pub fn revoke(&self, token: &str) -> bool {
        self.inner.remove(token).is_some()
    }

    /// Drop every expired credential and return how many went.
    pub fn purge_expired(&self) -> usize {
        let before = self.inner.len();
        self.inner.retain(|_, info| !self.is_expired(info));
        let purged = before.saturating_sub(self.inner.len());
        if purged > 0 {
            tracing::debug!(purged, active = self.inner.len(), "Expired session tokens purged");
        }
        purged
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    fn is_expired(&self, info: &TokenInfo) -> bool {
        info.issued_at.elapsed() >= self.ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_lookup_revoke() {
        let store = TokenStore::new();
        let token = store.issue(7, "student");

        let info = store.lookup(&token).unwrap();
        assert_eq!(info.login_id, 7);
        assert_eq!(info.role, "student");

        assert!(store.revoke(&token));
        assert!(!store.revoke(&token));
        assert!(store.is_empty());
    }

    #[test]
    fn test_tokens_are_unique() {
        let store = TokenStore::new();
        let a = store.issue(1, "student");
        let b = store.issue(1, "student");
        assert_ne!(a, b);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_expired_token_dropped_on_lookup() {
        let store = TokenStore::with_ttl(Duration::ZERO);
        let token = store.issue(1, "student");
        assert_eq!(store.len(), 1);

        assert!(store.lookup(&token).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_purge_keeps_live_tokens() {
        let expired = TokenStore::with_ttl(Duration::ZERO);
        expired.issue(1, "student");
        expired.issue(2, "student");
        assert_eq!(expired.purge_expired(), 2);
        assert!(expired.is_empty());

        let live = TokenStore::new();
        let token = live.issue(3, "student");
        assert_eq!(live.purge_expired(), 0);
        assert!(live.lookup(&token).is_some());
    }
}
