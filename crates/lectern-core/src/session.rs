//! Conversation session tracking for multi-turn queries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;

/// Speaker of one conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    fn label(self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Assistant => "Assistant",
        }
    }
}

/// One completed message in a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

#[derive(Debug)]
struct Session {
    turns: Vec<Turn>,
    created_at: DateTime<Utc>,
}

/// In-memory store of per-session conversation turns.
///
/// Turn logs are append-only for the process lifetime; the history
/// bound applies when rendering, not when storing. Appends for a given
/// session are serialized by the store lock, so concurrent queries on
/// the same session keep their call order.
pub struct SessionStore {
    sessions: Mutex<HashMap<String, Session>>,
    max_history: usize,
}

impl SessionStore {
    /// Create a store that renders at most `max_history` exchanges
    /// (a user message plus its answer each) per history request
    pub fn new(max_history: usize) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            max_history,
        }
    }

    /// Create a session and return its opaque id
    pub fn create_session(&self) -> String {
        let id = generate_session_id();
        let mut sessions = self.lock_sessions();
        sessions.insert(
            id.clone(),
            Session {
                turns: Vec::new(),
                created_at: Utc::now(),
            },
        );
        id
    }

    /// Render the most recent exchanges as prompt-ready history.
    ///
    /// Returns `None` for unknown or empty sessions, and when the
    /// configured bound is zero. Turns beyond the bound are dropped
    /// oldest first.
    pub fn get_history(&self, session_id: &str) -> Option<String> {
        let keep = self.max_history.saturating_mul(2);
        if keep == 0 {
            return None;
        }

        let sessions = self.lock_sessions();
        let session = sessions.get(session_id)?;
        if session.turns.is_empty() {
            return None;
        }

        let start = session.turns.len().saturating_sub(keep);
        let lines: Vec<String> = session.turns[start..]
            .iter()
            .map(|turn| format!("{}: {}", turn.role.label(), turn.text))
            .collect();
        Some(lines.join("\n"))
    }

    /// Append one turn, creating the session if it does not exist yet
    pub fn add_turn(&self, session_id: &str, role: Role, text: &str) {
        let mut sessions = self.lock_sessions();
        let session = sessions
            .entry(session_id.to_string())
            .or_insert_with(|| Session {
                turns: Vec::new(),
                created_at: Utc::now(),
            });
        session.turns.push(Turn {
            role,
            text: text.to_string(),
        });
    }

    /// Append a completed user/assistant exchange under one lock so the
    /// pair can never interleave with another query's turns
    pub fn add_exchange(&self, session_id: &str, user_text: &str, assistant_text: &str) {
        let mut sessions = self.lock_sessions();
        let session = sessions
            .entry(session_id.to_string())
            .or_insert_with(|| Session {
                turns: Vec::new(),
                created_at: Utc::now(),
            });
        session.turns.push(Turn {
            role: Role::User,
            text: user_text.to_string(),
        });
        session.turns.push(Turn {
            role: Role::Assistant,
            text: assistant_text.to_string(),
        });
    }

    /// Creation time of a session, when it exists
    pub fn created_at(&self, session_id: &str) -> Option<DateTime<Utc>> {
        self.lock_sessions()
            .get(session_id)
            .map(|session| session.created_at)
    }

    /// Number of turns stored for a session
    pub fn turn_count(&self, session_id: &str) -> usize {
        self.lock_sessions()
            .get(session_id)
            .map(|session| session.turns.len())
            .unwrap_or(0)
    }

    fn lock_sessions(&self) -> std::sync::MutexGuard<'_, HashMap<String, Session>> {
        // A poisoned lock still holds a valid turn log
        self.sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn generate_session_id() -> String {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    static SEQ: AtomicU64 = AtomicU64::new(0);

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let pid = std::process::id() as u128;
    let seq = SEQ.fetch_add(1, Ordering::Relaxed) as u128;
    let mixed = nanos ^ pid.wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ (seq << 40);

    format!(
        "{:08x}-{:04x}-4{:03x}-{:04x}-{:012x}",
        (mixed >> 96) as u32,
        (mixed >> 80) as u16,
        (mixed >> 64) as u16 & 0x0FFF,
        ((mixed >> 48) as u16 & 0x3FFF) | 0x8000,
        mixed as u64 & 0xFFFF_FFFF_FFFF,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_create_session_unique_ids() {
        let store = SessionStore::new(2);
        let ids: HashSet<String> = (0..64).map(|_| store.create_session()).collect();
        assert_eq!(ids.len(), 64);
        for id in &ids {
            assert_eq!(id.len(), 36);
            assert_eq!(id.chars().filter(|&c| c == '-').count(), 4);
        }
    }

    #[test]
    fn test_history_unknown_and_empty() {
        let store = SessionStore::new(2);
        assert_eq!(store.get_history("nope"), None);
        let id = store.create_session();
        assert_eq!(store.get_history(&id), None);
    }

    #[test]
    fn test_history_renders_roles_in_order() {
        let store = SessionStore::new(2);
        let id = store.create_session();
        store.add_exchange(&id, "hello", "hi there");
        assert_eq!(
            store.get_history(&id).as_deref(),
            Some("User: hello\nAssistant: hi there")
        );
    }

    #[test]
    fn test_history_bounded_to_recent_exchanges() {
        let store = SessionStore::new(2);
        let id = store.create_session();
        for i in 1..=4 {
            store.add_exchange(&id, &format!("q{}", i), &format!("a{}", i));
        }

        let history = store.get_history(&id).expect("history");
        // Only the last two exchanges survive rendering
        assert_eq!(
            history,
            "User: q3\nAssistant: a3\nUser: q4\nAssistant: a4"
        );
        // Storage itself is unbounded
        assert_eq!(store.turn_count(&id), 8);
    }

    #[test]
    fn test_zero_bound_renders_nothing() {
        let store = SessionStore::new(0);
        let id = store.create_session();
        store.add_exchange(&id, "q", "a");
        assert_eq!(store.get_history(&id), None);
    }

    #[test]
    fn test_add_turn_creates_session_lazily() {
        let store = SessionStore::new(2);
        store.add_turn("external-id", Role::User, "hello");
        assert_eq!(store.turn_count("external-id"), 1);
        assert!(store.created_at("external-id").is_some());
        assert_eq!(store.get_history("external-id").as_deref(), Some("User: hello"));
    }

    #[test]
    fn test_odd_turn_windows() {
        let store = SessionStore::new(1);
        let id = store.create_session();
        store.add_turn(&id, Role::User, "one");
        store.add_turn(&id, Role::Assistant, "two");
        store.add_turn(&id, Role::User, "three");
        // Window of two messages slides over the raw turn list
        assert_eq!(
            store.get_history(&id).as_deref(),
            Some("Assistant: two\nUser: three")
        );
    }
}
