use chrono::{DateTime, Utc};
use common::Member;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub owner: Member,
    pub created_at: DateTime<Utc>,
    pub last_accessed_at: DateTime<Utc>,
}

impl Session {
    fn new(owner: Member) -> Self {
        let now = Utc::now();

        Self {
            token: Uuid::new_v4().to_string(),
            owner,
            created_at: now,
            last_accessed_at: now,
        }
    }

    fn is_expired(&self, max_inactive: chrono::Duration, now: DateTime<Utc>) -> bool {
        now - self.last_accessed_at >= max_inactive
    }
}

/// In-memory session store keyed by an opaque token.
///
/// Cloning is cheap and every clone shares the same map, so the store is
/// handed explicitly to whatever needs it. Lookups never create sessions.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<DashMap<String, Session>>,
    max_inactive: chrono::Duration,
}

impl SessionStore {
    pub fn new(max_inactive: Duration) -> Self {
        let max_inactive =
            chrono::Duration::from_std(max_inactive).unwrap_or(chrono::Duration::MAX);

        Self {
            sessions: Arc::new(DashMap::new()),
            max_inactive,
        }
    }

    pub fn max_inactive_secs(&self) -> i64 {
        self.max_inactive.num_seconds()
    }

    pub fn create(&self, owner: Member) -> String {
        let session = Session::new(owner);
        let token = session.token.clone();

        log::info!(
            "Created session {} for member {}",
            token,
            session.owner.login_id
        );
        self.sessions.insert(token.clone(), session);

        token
    }

    /// Returns the owner of a live session and refreshes its last access time.
    pub fn lookup(&self, token: &str) -> Option<Member> {
        self.session(token).map(|session| session.owner)
    }

    /// Full session record for a live token, refreshing its last access time.
    pub fn session(&self, token: &str) -> Option<Session> {
        let now = Utc::now();
        let mut entry = self.sessions.get_mut(token)?;

        if entry.is_expired(self.max_inactive, now) {
            drop(entry);
            self.sessions
                .remove_if(token, |_, session| session.is_expired(self.max_inactive, now));
            log::debug!("Session {} expired", token);
            return None;
        }

        entry.last_accessed_at = now;
        Some(entry.clone())
    }

    pub fn invalidate(&self, token: &str) {
        if self.sessions.remove(token).is_some() {
            log::info!("Invalidated session: {}", token);
        }
    }

    pub fn cleanup_expired(&self) -> usize {
        let now = Utc::now();
        let mut removed = 0;

        self.sessions.retain(|token, session| {
            if session.is_expired(self.max_inactive, now) {
                log::debug!("Cleaned up expired session: {}", token);
                removed += 1;
                false
            } else {
                true
            }
        });

        if removed > 0 {
            log::info!("Cleaned up {} expired sessions", removed);
        }

        removed
    }

    pub fn active_count(&self) -> usize {
        self.sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member() -> Member {
        Member {
            id: 1,
            login_id: "test".to_string(),
            name: "Tester".to_string(),
            password_hash: String::new(),
        }
    }

    #[test]
    fn test_create_then_lookup() {
        let store = SessionStore::new(Duration::from_secs(1800));

        let token = store.create(member());
        assert_eq!(store.lookup(&token), Some(member()));
        assert_eq!(store.active_count(), 1);
    }

    #[test]
    fn test_tokens_are_unique() {
        let store = SessionStore::new(Duration::from_secs(1800));

        let first = store.create(member());
        let second = store.create(member());
        assert_ne!(first, second);
        assert_eq!(store.active_count(), 2);
    }

    #[test]
    fn test_lookup_unknown_token_does_not_create() {
        let store = SessionStore::new(Duration::from_secs(1800));

        assert!(store.lookup("missing").is_none());
        assert_eq!(store.active_count(), 0);
    }

    #[test]
    fn test_invalidate_is_idempotent() {
        let store = SessionStore::new(Duration::from_secs(1800));

        let token = store.create(member());
        store.invalidate(&token);
        store.invalidate(&token);

        assert!(store.lookup(&token).is_none());
        assert_eq!(store.active_count(), 0);
    }

    #[test]
    fn test_lookup_refreshes_last_access() {
        let store = SessionStore::new(Duration::from_secs(1800));

        let token = store.create(member());
        let before = store.session(&token).unwrap();
        std::thread::sleep(Duration::from_millis(5));
        let after = store.session(&token).unwrap();

        assert_eq!(before.created_at, after.created_at);
        assert!(after.last_accessed_at > before.last_accessed_at);
    }

    #[test]
    fn test_session_expiry() {
        let store = SessionStore::new(Duration::ZERO); // Expire immediately

        let token = store.create(member());
        std::thread::sleep(Duration::from_millis(10));

        assert!(store.lookup(&token).is_none());
        assert_eq!(store.active_count(), 0);
    }

    #[test]
    fn test_cleanup_expired() {
        let store = SessionStore::new(Duration::ZERO);

        store.create(member());
        store.create(member());
        std::thread::sleep(Duration::from_millis(10));

        assert_eq!(store.cleanup_expired(), 2);
        assert_eq!(store.active_count(), 0);
    }
}
