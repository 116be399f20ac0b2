//! In-memory session store
//!
//! Sessions live in a sharded concurrent map, each behind its own async
//! mutex. Requests on different sessions never contend; a chat exchange on one
//! session holds that session's lock from the user turn to the assistant turn,
//! so concurrent requests sharing a session id are applied one after another.
//!
//! Nothing is persisted and sessions never expire: history lasts for the
//! lifetime of the process.

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

use super::turn::Turn;

/// Exclusive handle to one session, held across a chat exchange
pub type SessionGuard = OwnedMutexGuard<Session>;

/// A bounded conversation history
#[derive(Debug)]
pub struct Session {
    id: String,
    turns: VecDeque<Turn>,
    max_turns: usize,
    created_at: DateTime<Utc>,
}

impl Session {
    fn new(id: &str, max_turns: usize) -> Self {
        Self {
            id: id.to_string(),
            turns: VecDeque::with_capacity(max_turns + 1),
            max_turns,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Append a turn, evicting the oldest turns beyond the cap
    pub fn push(&mut self, turn: Turn) {
        self.turns.push_back(turn);
        while self.turns.len() > self.max_turns {
            self.turns.pop_front();
        }
    }

    /// Snapshot of the history, oldest first
    pub fn turns(&self) -> Vec<Turn> {
        self.turns.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

/// Session store shared by all request handlers
pub struct SessionStore {
    sessions: DashMap<String, Arc<Mutex<Session>>>,
    max_turns: usize,
}

impl SessionStore {
    /// Create a store that keeps at most `max_turns` turns per session
    pub fn new(max_turns: usize) -> Self {
        Self {
            sessions: DashMap::new(),
            max_turns: max_turns.max(1),
        }
    }

    pub fn max_turns(&self) -> usize {
        self.max_turns
    }

    /// Return the session's turns, creating an empty session for an unseen id
    pub async fn get_or_create(&self, id: &str) -> Vec<Turn> {
        self.slot(id).lock().await.turns()
    }

    /// Append a turn to the session, creating it if needed
    pub async fn append(&self, id: &str, turn: Turn) {
        self.slot(id).lock().await.push(turn);
    }

    /// Take exclusive access to a session for a whole exchange
    pub async fn lock(&self, id: &str) -> SessionGuard {
        self.slot(id).lock_owned().await
    }

    /// Number of live sessions
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.sessions.contains_key(id)
    }

    // The map guard must not outlive this call: it pins a shard lock.
    fn slot(&self, id: &str) -> Arc<Mutex<Session>> {
        self.sessions
            .entry(id.to_string())
            .or_insert_with(|| {
                debug!(session_id = %id, "Session created");
                Arc::new(Mutex::new(Session::new(id, self.max_turns)))
            })
            .value()
            .clone()
    }
}
