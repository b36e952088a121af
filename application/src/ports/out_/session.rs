use async_trait::async_trait;
use thiserror::Error;

use domain::{ParticipantId, SessionError, SessionEvent, SessionId};

#[derive(Debug, Error)]
pub enum SessionServiceError {
    #[error("session not found: {0:?}")]
    SessionNotFound(SessionId),

    #[error(transparent)]
    Session(#[from] SessionError),
}

#[async_trait]
pub trait SessionNotifier: Send + Sync {
    async fn notify_participant(
        &self,
        participant_id: ParticipantId,
        event: SessionEvent,
    );
}
