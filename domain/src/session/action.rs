use crate::{Participant, ParticipantId, TimerId};

#[derive(Clone, Debug)]
pub enum SessionAction {
    Join(Participant),
    Submit { participant_id: ParticipantId, word: String },
    DeadlineElapsed(TimerId),
    Disconnect(ParticipantId),
}
