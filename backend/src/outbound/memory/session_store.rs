//! `SessionStore` kept in process memory.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tokio::sync::RwLock;

use crate::domain::ports::{SessionStore, SessionStoreError};
use crate::domain::{Session, SessionId};

/// In-memory session store.
///
/// Expired records are evicted when loaded, and every save sweeps the whole
/// map so abandoned sessions do not accumulate.
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<SessionId, Session>>,
    clock: Arc<dyn Clock>,
}

impl MemorySessionStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            clock,
        }
    }

    /// Number of records currently held, expired ones included.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, id: &SessionId) -> Result<Option<Session>, SessionStoreError> {
        let now = self.clock.utc();
        {
            let sessions = self.sessions.read().await;
            match sessions.get(id) {
                None => return Ok(None),
                Some(session) if !session.is_expired(now) => return Ok(Some(session.clone())),
                Some(_) => {}
            }
        }
        self.sessions.write().await.remove(id);
        Ok(None)
    }

    async fn save(&self, session: &Session) -> Result<(), SessionStoreError> {
        let now = self.clock.utc();
        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, stored| !stored.is_expired(now));
        if !session.is_expired(now) {
            sessions.insert(session.id.clone(), session.clone());
        }
        Ok(())
    }

    async fn destroy(&self, id: &SessionId) -> Result<(), SessionStoreError> {
        self.sessions.write().await.remove(id);
        Ok(())
    }
}
