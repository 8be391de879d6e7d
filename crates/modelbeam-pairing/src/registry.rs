//! Registry of discovered viewer sessions.

use tokio::sync::RwLock;
use tracing::debug;

use modelbeam_common::SessionId;

/// One paired viewer, as first observed on the ping URL.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    /// True while this session has not yet received the latest content.
    pub is_stale: bool,
}

/// Insertion-ordered, duplicate-free set of viewer sessions.
///
/// Exclusively owns the session values; the dispatcher reads and updates
/// staleness only through these operations.
pub struct SessionRegistry {
    sessions: RwLock<Vec<Session>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(Vec::new()),
        }
    }

    /// Add a session if its id is unseen. Returns true iff it was new;
    /// re-registering is idempotent.
    pub async fn register(&self, id: SessionId) -> bool {
        let mut sessions = self.sessions.write().await;
        if sessions.iter().any(|s| s.id == id) {
            return false;
        }
        debug!(session = %id, "registered viewer session");
        sessions.push(Session {
            id,
            is_stale: true,
        });
        true
    }

    /// Flag every session as needing the next dispatch.
    pub async fn mark_all_stale(&self) {
        for session in self.sessions.write().await.iter_mut() {
            session.is_stale = true;
        }
    }

    /// Record that `id` received the latest content.
    pub async fn clear_stale(&self, id: &SessionId) {
        if let Some(session) = self
            .sessions
            .write()
            .await
            .iter_mut()
            .find(|s| &s.id == id)
        {
            session.is_stale = false;
        }
    }

    /// Snapshot in discovery order (first-discovered first).
    pub async fn list(&self) -> Vec<Session> {
        self.sessions.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
