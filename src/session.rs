//! Server-side session state for the login gate.
//!
//! Two states per client: anonymous or authenticated. A client becomes
//! authenticated by presenting the fixed credential pair; the store
//! keeps one entry per issued session id until logout or expiry.
//!
//! Key properties:
//! - State lives only in memory — a restart logs everyone out
//! - Lookup touches the entry, so active sessions stay alive
//! - The store is plain data with no HTTP awareness, testable alone

use std::collections::HashMap;
use std::time::{Duration, Instant};

use uuid::Uuid;

/// Idle sessions expire after 8 hours.
const SESSION_TTL_SECS: u64 = 8 * 60 * 60;

/// Auth state of one client, as seen by the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Anonymous,
    Authenticated,
}

struct SessionEntry {
    last_seen: Instant,
}

/// All live login sessions, keyed by the opaque id in the cookie.
pub struct SessionStore {
    sessions: HashMap<String, SessionEntry>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::with_ttl(Duration::from_secs(SESSION_TTL_SECS))
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: HashMap::new(),
            ttl,
        }
    }

    /// Transition anonymous → authenticated: issue a fresh session id.
    ///
    /// Also sweeps out every expired entry. Abandoned cookies are never
    /// presented again, so without the sweep the map would only grow.
    pub fn login(&mut self) -> String {
        let now = Instant::now();
        self.sessions
            .retain(|_, entry| now.duration_since(entry.last_seen) < self.ttl);

        let id = Uuid::new_v4().to_string();
        self.sessions.insert(id.clone(), SessionEntry { last_seen: now });
        id
    }

    /// Transition authenticated → anonymous. Unknown ids are a no-op;
    /// logging out twice is harmless.
    pub fn logout(&mut self, session_id: &str) {
        self.sessions.remove(session_id);
    }

    /// Current state for a session id, touching the entry so active
    /// sessions do not expire mid-use. Expired entries are dropped here.
    pub fn state(&mut self, session_id: &str) -> AuthState {
        let now = Instant::now();
        match self.sessions.get_mut(session_id) {
            Some(entry) if now.duration_since(entry.last_seen) < self.ttl => {
                entry.last_seen = now;
                AuthState::Authenticated
            }
            Some(_) => {
                self.sessions.remove(session_id);
                AuthState::Anonymous
            }
            None => AuthState::Anonymous,
        }
    }

    pub fn active_count(&self) -> usize {
        self.sessions.len()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Exact-match check against the configured credential pair.
pub fn credentials_match(expected: (&str, &str), username: &str, password: &str) -> bool {
    expected.0 == username && expected.1 == password
}
