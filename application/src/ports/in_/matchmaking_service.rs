use tracing::{info, warn};

use crate::ports::in_::RoundCoordinator;
use crate::ports::out_::SessionServiceError;
use crate::registry::{SessionRegistry, SessionTable};
use domain::{Participant, ParticipantId, RoundConfig, SessionAction, SessionEffect, SessionId, SessionState};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct JoinTicket {
    pub session_id: SessionId,
    pub participant_id: ParticipantId,
    /// Nobody to play with yet.
    pub is_first: bool,
}

pub struct MatchmakingService {
    registry: SessionRegistry,
    coordinator: RoundCoordinator,
    config: RoundConfig,
}

impl MatchmakingService {
    pub fn new(
        coordinator: RoundCoordinator,
        config: RoundConfig,
    ) -> Self {
        Self {
            registry: coordinator.registry().clone(),
            coordinator,
            config,
        }
    }

    /// Seats the participant in a session waiting for an opponent, or opens a
    /// new one. Pairing starts round 1 before this returns.
    pub async fn join(
        &self,
        participant: Participant,
    ) -> Result<JoinTicket, SessionServiceError> {
        let participant_id = participant.id();
        let mut table = self.registry.lock().await;

        let (session_id, effects) = match self.attach_to_waiting(&mut table, &participant) {
            Some(attached) => attached,
            None => self.open_session(&mut table, participant)?,
        };

        let is_first = table
            .get(session_id)
            .is_some_and(|session| session.is_waiting_for_opponent());
        if is_first {
            info!(session_id = ?session_id, participant_id = ?participant_id, "Session opened");
        } else {
            info!(session_id = ?session_id, participant_id = ?participant_id, "Participants paired");
        }

        let outbox = self.coordinator.apply_effects(&mut table, session_id, effects);
        drop(table);
        self.coordinator.deliver(outbox).await;

        Ok(JoinTicket {
            session_id,
            participant_id,
            is_first,
        })
    }

    fn attach_to_waiting(
        &self,
        table: &mut SessionTable,
        participant: &Participant,
    ) -> Option<(SessionId, Vec<SessionEffect>)> {
        let session_id = table.find_waiting()?;
        let session = table.get_mut(session_id)?;
        match session.handle(SessionAction::Join(participant.clone())) {
            Ok(effects) => Some((session_id, effects)),
            Err(e) => {
                warn!(session_id = ?session_id, error = %e, "Waiting session refused join, opening a new one");
                None
            }
        }
    }

    fn open_session(
        &self,
        table: &mut SessionTable,
        participant: Participant,
    ) -> Result<(SessionId, Vec<SessionEffect>), SessionServiceError> {
        // Joined before it is registered, so a refused join leaves nothing behind.
        let mut session = SessionState::new(SessionId::new(), self.config.clone());
        let effects = session.handle(SessionAction::Join(participant))?;
        let session_id = session.id();
        table.insert(session);
        Ok((session_id, effects))
    }
}
