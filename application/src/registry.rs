use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use domain::{SessionId, SessionState};

/// Live sessions keyed by id. Finished sessions are never kept here.
#[derive(Default)]
pub struct SessionTable {
    sessions: HashMap<SessionId, SessionState>,
}

impl SessionTable {
    pub(crate) fn insert(
        &mut self,
        session: SessionState,
    ) {
        self.sessions.insert(session.id(), session);
    }

    pub(crate) fn remove(
        &mut self,
        id: SessionId,
    ) -> Option<SessionState> {
        self.sessions.remove(&id)
    }

    pub(crate) fn get_mut(
        &mut self,
        id: SessionId,
    ) -> Option<&mut SessionState> {
        self.sessions.get_mut(&id)
    }

    /// Any session holding a single participant that still awaits an opponent.
    pub(crate) fn find_waiting(&self) -> Option<SessionId> {
        self.sessions
            .values()
            .find(|s| s.is_waiting_for_opponent())
            .map(SessionState::id)
    }

    pub fn get(
        &self,
        id: SessionId,
    ) -> Option<&SessionState> {
        self.sessions.get(&id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// Shared handle to the session table. Every mutation of session state goes
/// through one lock, so events for a session are applied one at a time. The
/// lock is never held while messages are delivered.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    table: Arc<Mutex<SessionTable>>,
}

impl SessionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) async fn lock(&self) -> MutexGuard<'_, SessionTable> {
        self.table.lock().await
    }

    pub async fn snapshot(
        &self,
        id: SessionId,
    ) -> Option<SessionState> {
        self.table.lock().await.get(id).cloned()
    }

    pub async fn contains(
        &self,
        id: SessionId,
    ) -> bool {
        self.table.lock().await.get(id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.table.lock().await.len()
    }
}
