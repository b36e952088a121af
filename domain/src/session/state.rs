use std::collections::HashMap;

use crate::{Participant, ParticipantId, SessionId, TimerId};

use super::{
    RoundConfig, RoundRecord, SessionAction, SessionEffect, SessionError, SessionEvent, SessionOutcome, SessionStatus,
    SubmittedWord,
};

const MAX_PARTICIPANTS: usize = 2;

#[derive(Clone, Debug)]
pub struct SessionState {
    id: SessionId,
    config: RoundConfig,
    pub(super) status: SessionStatus,
    pub(super) participants: Vec<Participant>,
    pub(super) round: u32,
    pub(super) submissions: HashMap<ParticipantId, String>,
    pub(super) history: Vec<RoundRecord>,
    pub(super) deadline: Option<TimerId>,
}

impl SessionState {
    pub fn handle(
        &mut self,
        action: SessionAction,
    ) -> Result<Vec<SessionEffect>, SessionError> {
        match action {
            SessionAction::Join(participant) => self.handle_join(participant),
            SessionAction::Submit { participant_id, word } => self.handle_submit(participant_id, &word),
            SessionAction::DeadlineElapsed(timer) => self.handle_deadline(timer),
            SessionAction::Disconnect(participant_id) => self.handle_disconnect(participant_id),
        }
    }

    /// Records the timer that now bounds the current round.
    pub fn deadline_armed(
        &mut self,
        timer: TimerId,
    ) {
        self.deadline = Some(timer);
    }

    fn require_status(
        &self,
        required: SessionStatus,
        action: &'static str,
    ) -> Result<(), SessionError> {
        if self.status != required {
            return Err(SessionError::InvalidStatus {
                action,
                status: self.status,
            });
        }
        Ok(())
    }
}

impl SessionState {
    #[must_use]
    pub fn new(
        id: SessionId,
        config: RoundConfig,
    ) -> Self {
        Self {
            id,
            config,
            status: SessionStatus::AwaitingOpponent,
            participants: Vec::with_capacity(MAX_PARTICIPANTS),
            round: 1,
            submissions: HashMap::new(),
            history: Vec::new(),
            deadline: None,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn history(&self) -> &[RoundRecord] {
        &self.history
    }

    pub fn deadline(&self) -> Option<TimerId> {
        self.deadline
    }

    pub fn submission(
        &self,
        participant_id: ParticipantId,
    ) -> Option<&str> {
        self.submissions.get(&participant_id).map(String::as_str)
    }

    /// True when a join can land here without opening a new session.
    pub fn is_waiting_for_opponent(&self) -> bool {
        self.status == SessionStatus::AwaitingOpponent && self.participants.len() == 1
    }

    pub fn has_participant(
        &self,
        participant_id: ParticipantId,
    ) -> bool {
        self.participants.iter().any(|p| p.id() == participant_id)
    }

    fn opponent_of(
        &self,
        participant_id: ParticipantId,
    ) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id() != participant_id)
    }

    fn notify_all(
        &self,
        event: SessionEvent,
    ) -> impl Iterator<Item = SessionEffect> + '_ {
        self.participants.iter().map(move |p| SessionEffect::Notify {
            participant_id: p.id(),
            event: event.clone(),
        })
    }

    fn handle_join(
        &mut self,
        participant: Participant,
    ) -> Result<Vec<SessionEffect>, SessionError> {
        self.require_status(SessionStatus::AwaitingOpponent, "Join")?;
        if self.has_participant(participant.id()) {
            return Err(SessionError::AlreadyParticipating(participant.id()));
        }
        if self.participants.len() >= MAX_PARTICIPANTS {
            return Err(SessionError::SessionFull);
        }

        let joined = SessionEffect::Notify {
            participant_id: participant.id(),
            event: SessionEvent::Joined {
                session_id: self.id,
                participant_id: participant.id(),
            },
        };
        self.participants.push(participant);

        if self.participants.len() < MAX_PARTICIPANTS {
            let waiting = SessionEffect::Notify {
                participant_id: self.participants[0].id(),
                event: SessionEvent::Waiting,
            };
            return Ok(vec![joined, waiting]);
        }

        let mut effects = vec![joined];
        for participant in &self.participants {
            if let Some(opponent) = self.opponent_of(participant.id()) {
                effects.push(SessionEffect::Notify {
                    participant_id: participant.id(),
                    event: SessionEvent::OpponentInfo {
                        nickname: opponent.nickname().to_string(),
                    },
                });
            }
        }

        self.status = SessionStatus::RoundInProgress;
        effects.extend(self.start_round());
        Ok(effects)
    }

    fn start_round(&mut self) -> Vec<SessionEffect> {
        let mut effects = Vec::new();
        if let Some(previous) = self.deadline.take() {
            effects.push(SessionEffect::CancelDeadline(previous));
        }
        self.submissions.clear();

        for participant in &self.participants {
            let opponent_nickname = self
                .opponent_of(participant.id())
                .map(|o| o.nickname().to_string())
                .unwrap_or_default();
            effects.push(SessionEffect::Notify {
                participant_id: participant.id(),
                event: SessionEvent::RoundStart {
                    round: self.round,
                    opponent_nickname,
                    deadline_secs: self.config.deadline.as_secs(),
                },
            });
        }

        effects.push(SessionEffect::ArmDeadline {
            delay: self.config.deadline,
        });
        effects
    }

    fn handle_submit(
        &mut self,
        participant_id: ParticipantId,
        word: &str,
    ) -> Result<Vec<SessionEffect>, SessionError> {
        self.require_status(SessionStatus::RoundInProgress, "Submit")?;
        if !self.has_participant(participant_id) {
            return Err(SessionError::UnknownParticipant(participant_id));
        }

        self.submissions.insert(participant_id, word.trim().to_string());

        let all_submitted = self
            .participants
            .iter()
            .all(|p| self.submissions.contains_key(&p.id()));
        if !all_submitted {
            return Ok(self
                .opponent_of(participant_id)
                .map(|opponent| SessionEffect::Notify {
                    participant_id: opponent.id(),
                    event: SessionEvent::OpponentSubmitted,
                })
                .into_iter()
                .collect());
        }

        let mut effects = Vec::new();
        if let Some(timer) = self.deadline.take() {
            effects.push(SessionEffect::CancelDeadline(timer));
        }
        effects.extend(self.resolve_round());
        Ok(effects)
    }

    fn resolve_round(&mut self) -> Vec<SessionEffect> {
        let mut words: Vec<SubmittedWord> = self
            .participants
            .iter()
            .map(|p| SubmittedWord {
                participant_id: p.id(),
                nickname: p.nickname().to_string(),
                word: self.submissions.get(&p.id()).cloned().unwrap_or_default(),
            })
            .collect();

        if words_match(&words[0].word, &words[1].word) {
            self.status = SessionStatus::Finished;
            let event = SessionEvent::Win {
                word: words.swap_remove(0).word,
                history: self.history.clone(),
            };
            let mut effects: Vec<_> = self.notify_all(event).collect();
            effects.push(SessionEffect::Close(SessionOutcome::Won));
            return effects;
        }

        let event = SessionEvent::RoundMismatch {
            round: self.round,
            a: words[0].clone(),
            b: words[1].clone(),
        };
        self.history.push(RoundRecord { round: self.round, words });
        let mut effects: Vec<_> = self.notify_all(event).collect();

        self.round += 1;
        effects.extend(self.start_round());
        effects
    }

    fn handle_deadline(
        &mut self,
        timer: TimerId,
    ) -> Result<Vec<SessionEffect>, SessionError> {
        self.require_status(SessionStatus::RoundInProgress, "DeadlineElapsed")?;
        if self.deadline != Some(timer) {
            return Err(SessionError::StaleDeadline(timer));
        }

        self.deadline = None;
        self.status = SessionStatus::Finished;
        let mut effects: Vec<_> = self.notify_all(SessionEvent::Timeout).collect();
        effects.push(SessionEffect::Close(SessionOutcome::TimedOut));
        Ok(effects)
    }

    fn handle_disconnect(
        &mut self,
        participant_id: ParticipantId,
    ) -> Result<Vec<SessionEffect>, SessionError> {
        if self.status == SessionStatus::Finished {
            return Err(SessionError::InvalidStatus {
                action: "Disconnect",
                status: self.status,
            });
        }
        let Some(pos) = self.participants.iter().position(|p| p.id() == participant_id) else {
            return Err(SessionError::UnknownParticipant(participant_id));
        };

        self.participants.remove(pos);
        self.submissions.remove(&participant_id);

        let mut effects = Vec::new();
        if let Some(timer) = self.deadline.take() {
            effects.push(SessionEffect::CancelDeadline(timer));
        }
        self.status = SessionStatus::Finished;
        effects.extend(self.notify_all(SessionEvent::OpponentLeft));
        effects.push(SessionEffect::Close(SessionOutcome::Abandoned));
        Ok(effects)
    }
}

fn normalize(word: &str) -> String {
    word.trim().to_lowercase()
}

fn words_match(
    a: &str,
    b: &str,
) -> bool {
    normalize(a) == normalize(b)
}
