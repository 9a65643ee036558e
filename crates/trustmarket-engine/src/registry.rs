//! The live-session registry.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use trustmarket_types::{Result, Session, SessionId, TrustmarketError};

/// Shared handle to one live session.
pub type SessionHandle = Arc<Mutex<Session>>;

/// Concurrency-safe map of every live session.
///
/// Lock ordering: never hold a session's mutex while touching the map.
/// Handlers resolve the handle first, release the map shard, then lock.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: DashMap<SessionId, SessionHandle>,
}

impl SessionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Insert a session, returning the handle it replaced (if any) so the
    /// caller can tear the old one down.
    pub fn insert(&self, session: Session) -> (SessionHandle, Option<SessionHandle>) {
        let id = session.id.clone();
        let handle: SessionHandle = Arc::new(Mutex::new(session));
        let replaced = self.sessions.insert(id, Arc::clone(&handle));
        (handle, replaced)
    }

    /// Resolve a session or fail with `SessionNotFound`.
    pub fn get(&self, id: &SessionId) -> Result<SessionHandle> {
        self.sessions
            .get(id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| TrustmarketError::SessionNotFound(id.clone()))
    }

    pub fn remove(&self, id: &SessionId) -> Option<SessionHandle> {
        self.sessions.remove(id).map(|(_, handle)| handle)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
