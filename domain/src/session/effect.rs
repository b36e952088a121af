use std::time::Duration;

use crate::{ParticipantId, TimerId};

use super::event::SessionEvent;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionOutcome {
    Won,
    TimedOut,
    Abandoned,
}

/// Side effects requested by a session transition, to be carried out in order
/// by the caller.
///
/// `ArmDeadline` must be answered with `SessionState::deadline_armed` so the
/// session knows which timer it owns. `Close` means the session has reached
/// `Finished` and has to leave the registry.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEffect {
    Notify {
        participant_id: ParticipantId,
        event: SessionEvent,
    },
    ArmDeadline {
        delay: Duration,
    },
    CancelDeadline(TimerId),
    Close(SessionOutcome),
}
