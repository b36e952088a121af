use std::sync::Arc;

use futures::FutureExt;
use tracing::{debug, info};

use crate::ports::out_::{Clock, DeadlineCallback, SessionNotifier, SessionServiceError};
use crate::registry::{SessionRegistry, SessionTable};
use domain::{ParticipantId, SessionAction, SessionEffect, SessionEvent, SessionId, TimerId};

/// Drives rounds for every live session: submissions, deadlines and
/// disconnects. Stale references (finished sessions, strangers, timers that
/// were superseded) are dropped with a debug log and never reach the caller.
#[derive(Clone)]
pub struct RoundCoordinator {
    registry: SessionRegistry,
    notifier: Arc<dyn SessionNotifier>,
    clock: Arc<dyn Clock>,
}

impl RoundCoordinator {
    pub fn new(
        registry: SessionRegistry,
        notifier: Arc<dyn SessionNotifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            registry,
            notifier,
            clock,
        }
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    pub async fn submit_word(
        &self,
        session_id: SessionId,
        participant_id: ParticipantId,
        word: String,
    ) {
        let action = SessionAction::Submit { participant_id, word };
        if let Err(e) = self.dispatch(session_id, action).await {
            debug!(session_id = ?session_id, participant_id = ?participant_id, error = %e, "Submission ignored");
        }
    }

    pub async fn on_deadline(
        &self,
        session_id: SessionId,
        timer: TimerId,
    ) {
        if let Err(e) = self.dispatch(session_id, SessionAction::DeadlineElapsed(timer)).await {
            debug!(session_id = ?session_id, timer = ?timer, error = %e, "Deadline ignored");
        }
    }

    pub async fn disconnect(
        &self,
        session_id: SessionId,
        participant_id: ParticipantId,
    ) {
        if let Err(e) = self.dispatch(session_id, SessionAction::Disconnect(participant_id)).await {
            debug!(session_id = ?session_id, participant_id = ?participant_id, error = %e, "Disconnect ignored");
        }
    }

    async fn dispatch(
        &self,
        session_id: SessionId,
        action: SessionAction,
    ) -> Result<(), SessionServiceError> {
        let outbox = {
            let mut table = self.registry.lock().await;
            let Some(session) = table.get_mut(session_id) else {
                return Err(SessionServiceError::SessionNotFound(session_id));
            };
            let effects = session.handle(action)?;
            self.apply_effects(&mut table, session_id, effects)
        };
        self.deliver(outbox).await;
        Ok(())
    }

    /// Applies timer and registry effects while the caller still holds the
    /// table lock, so a cancelled deadline never observes the session between
    /// steps. Notifications are returned in order for delivery after the lock
    /// is released.
    pub(crate) fn apply_effects(
        &self,
        table: &mut SessionTable,
        session_id: SessionId,
        effects: Vec<SessionEffect>,
    ) -> Vec<(ParticipantId, SessionEvent)> {
        let mut outbox = Vec::new();
        for effect in effects {
            match effect {
                SessionEffect::Notify { participant_id, event } => {
                    outbox.push((participant_id, event));
                }
                SessionEffect::ArmDeadline { delay } => {
                    let timer = self.clock.schedule(delay, self.deadline_callback(session_id));
                    if let Some(session) = table.get_mut(session_id) {
                        session.deadline_armed(timer);
                    }
                    debug!(session_id = ?session_id, timer = ?timer, delay = ?delay, "Deadline armed");
                }
                SessionEffect::CancelDeadline(timer) => {
                    self.clock.cancel(timer);
                }
                SessionEffect::Close(outcome) => {
                    table.remove(session_id);
                    info!(session_id = ?session_id, outcome = ?outcome, "Session closed");
                }
            }
        }
        outbox
    }

    pub(crate) async fn deliver(
        &self,
        outbox: Vec<(ParticipantId, SessionEvent)>,
    ) {
        for (participant_id, event) in outbox {
            self.notifier.notify_participant(participant_id, event).await;
        }
    }

    fn deadline_callback(
        &self,
        session_id: SessionId,
    ) -> DeadlineCallback {
        let coordinator = self.clone();
        Box::new(move |timer| async move { coordinator.on_deadline(session_id, timer).await }.boxed())
    }
}
