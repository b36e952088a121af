mod session;
mod types;

pub use session::{
    RoundConfig, RoundRecord, SessionAction, SessionEffect, SessionError, SessionEvent, SessionOutcome, SessionState,
    SessionStatus, SubmittedWord,
};
pub use types::{Participant, ParticipantId, SessionId, TimerId};
