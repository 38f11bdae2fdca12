//! Server-side sessions keyed by an opaque cookie token

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "routerchat_session";

/// Lifetime of a session unless configured otherwise
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Longer lifetimes are clamped to this
pub const MAX_SESSION_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

#[derive(Debug, Clone, Copy)]
struct Session {
    user_id: i64,
    expires_at: Instant,
}

/// Maps session tokens to user ids
///
/// Clones share the same table. Sessions are held in memory only and expire
/// `ttl` after creation. Expired entries are dropped when looked up and on
/// every new login.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<DashMap<String, Session>>,
    ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_ttl(DEFAULT_SESSION_TTL)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            ttl: ttl.min(MAX_SESSION_TTL),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Bind a fresh token to `user_id`
    pub fn create(&self, user_id: i64) -> String {
        let now = Instant::now();
        self.prune(now);

        let token = Uuid::new_v4().simple().to_string();
        self.sessions.insert(
            token.clone(),
            Session {
                user_id,
                expires_at: now + self.ttl,
            },
        );
        token
    }

    pub fn user_id(&self, token: &str) -> Option<i64> {
        let now = Instant::now();
        let session = self.sessions.get(token).map(|entry| *entry.value())?;
        if session.expires_at > now {
            return Some(session.user_id);
        }

        self.sessions
            .remove_if(token, |_, session| session.expires_at <= now);
        None
    }

    pub fn remove(&self, token: &str) {
        self.sessions.remove(token);
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn prune(&self, now: Instant) {
        self.sessions.retain(|_, session| session.expires_at > now);
    }
}

/// `Set-Cookie` value that installs a session token for `max_age`
pub fn session_cookie(token: &str, max_age: Duration, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; HttpOnly; Path=/; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE,
        token,
        max_age.as_secs()
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value that removes the session cookie
pub fn expired_session_cookie() -> String {
    format!(
        "{}=; HttpOnly; Path=/; SameSite=Lax; Max-Age=0",
        SESSION_COOKIE
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_resolve() {
        let sessions = SessionStore::new();
        let token = sessions.create(42);

        assert_eq!(token.len(), 32);
        assert_eq!(sessions.user_id(&token), Some(42));
        assert_eq!(sessions.user_id("unknown"), None);
    }

    #[test]
    fn test_tokens_are_unique() {
        let sessions = SessionStore::new();
        let first = sessions.create(1);
        let second = sessions.create(1);
        assert_ne!(first, second);
        assert_eq!(sessions.len(), 2);
    }

    #[test]
    fn test_remove() {
        let sessions = SessionStore::new();
        let token = sessions.create(5);
        sessions.remove(&token);
        assert_eq!(sessions.user_id(&token), None);
        assert!(sessions.is_empty());

        // Removing twice is fine
        sessions.remove(&token);
    }

    #[test]
    fn test_clones_share_state() {
        let sessions = SessionStore::new();
        let clone = sessions.clone();
        let token = clone.create(9);
        assert_eq!(sessions.user_id(&token), Some(9));
    }

    #[test]
    fn test_expired_token_resolves_to_nobody_and_is_dropped() {
        let sessions = SessionStore::with_ttl(Duration::ZERO);
        let token = sessions.create(1);
        assert_eq!(sessions.len(), 1);

        assert_eq!(sessions.user_id(&token), None);
        assert!(sessions.is_empty());
    }

    #[test]
    fn test_repeated_logins_do_not_accumulate_expired_sessions() {
        let sessions = SessionStore::with_ttl(Duration::ZERO);
        for _ in 0..1000 {
            sessions.create(1);
        }
        // Only the latest login survives the prune
        assert_eq!(sessions.len(), 1);
    }

    #[test]
    fn test_live_sessions_survive_prune() {
        let sessions = SessionStore::with_ttl(Duration::from_secs(60));
        let first = sessions.create(1);
        let second = sessions.create(2);
        assert_eq!(sessions.user_id(&first), Some(1));
        assert_eq!(sessions.user_id(&second), Some(2));
    }

    #[test]
    fn test_ttl_is_clamped() {
        let sessions = SessionStore::with_ttl(Duration::from_secs(u64::MAX));
        assert_eq!(sessions.ttl(), MAX_SESSION_TTL);
        let token = sessions.create(4);
        assert_eq!(sessions.user_id(&token), Some(4));
    }

    #[test]
    fn test_cookie_values() {
        assert_eq!(
            session_cookie("abc", Duration::from_secs(3600), false),
            "routerchat_session=abc; HttpOnly; Path=/; SameSite=Lax; Max-Age=3600"
        );
        assert!(session_cookie("abc", DEFAULT_SESSION_TTL, true).ends_with("; Secure"));
        assert!(expired_session_cookie().contains("Max-Age=0"));
    }
}
