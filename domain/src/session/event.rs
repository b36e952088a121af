use serde::Serialize;

use crate::{ParticipantId, SessionId};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SubmittedWord {
    #[serde(skip)]
    pub participant_id: ParticipantId,
    pub nickname: String,
    pub word: String,
}

/// A round that ended without a match.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RoundRecord {
    pub round: u32,
    pub words: Vec<SubmittedWord>,
}

/// Messages addressed to a single participant.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    Joined {
        session_id: SessionId,
        participant_id: ParticipantId,
    },
    OpponentInfo {
        nickname: String,
    },
    Waiting,
    RoundStart {
        round: u32,
        opponent_nickname: String,
        deadline_secs: u64,
    },
    OpponentSubmitted,
    RoundMismatch {
        round: u32,
        a: SubmittedWord,
        b: SubmittedWord,
    },
    Win {
        word: String,
        history: Vec<RoundRecord>,
    },
    Timeout,
    OpponentLeft,
}
