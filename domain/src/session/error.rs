use thiserror::Error;

use crate::{ParticipantId, TimerId};

use super::config::SessionStatus;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SessionError {
    #[error("action {action} not valid in status {status:?}")]
    InvalidStatus {
        action: &'static str,
        status: SessionStatus,
    },

    #[error("participant not in session: {0:?}")]
    UnknownParticipant(ParticipantId),

    #[error("participant already in session: {0:?}")]
    AlreadyParticipating(ParticipantId),

    #[error("session already has two participants")]
    SessionFull,

    #[error("deadline {0:?} is no longer armed")]
    StaleDeadline(TimerId),
}
