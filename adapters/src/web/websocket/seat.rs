use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use application::ports::in_::{JoinTicket, MatchmakingService, RoundCoordinator};
use domain::{Participant, ParticipantId, SessionId};

use super::notifier::{SharedSender, WebSocketNotifier};

/// Where a connection's participants receive their messages.
#[async_trait]
pub(crate) trait Outbound: Send + Sync {
    async fn bind(
        &self,
        participant_id: ParticipantId,
    );

    async fn unbind(
        &self,
        participant_id: ParticipantId,
    );
}

pub(crate) struct SocketOutbound {
    pub(crate) notifier: Arc<WebSocketNotifier>,
    pub(crate) sender: SharedSender,
}

#[async_trait]
impl Outbound for SocketOutbound {
    async fn bind(
        &self,
        participant_id: ParticipantId,
    ) {
        self.notifier.bind(participant_id, Arc::clone(&self.sender)).await;
    }

    async fn unbind(
        &self,
        participant_id: ParticipantId,
    ) {
        self.notifier.unbind(participant_id).await;
    }
}

/// The place one connection holds in a session, if any.
pub(crate) struct Seat<'a, O> {
    coordinator: &'a RoundCoordinator,
    matchmaking: &'a MatchmakingService,
    outbound: O,
    ticket: Option<JoinTicket>,
}

impl<'a, O: Outbound> Seat<'a, O> {
    pub(crate) fn new(
        coordinator: &'a RoundCoordinator,
        matchmaking: &'a MatchmakingService,
        outbound: O,
    ) -> Self {
        Self {
            coordinator,
            matchmaking,
            outbound,
            ticket: None,
        }
    }

    pub(crate) fn ticket(&self) -> Option<JoinTicket> {
        self.ticket
    }

    /// Ignored while the current seat's session is still live.
    pub(crate) async fn join(
        &mut self,
        nickname: String,
    ) {
        if let Some(ticket) = self.ticket {
            if self.coordinator.registry().contains(ticket.session_id).await {
                warn!(participant_id = ?ticket.participant_id, "Join ignored, already seated in a live session");
                return;
            }
            self.outbound.unbind(ticket.participant_id).await;
            self.ticket = None;
        }

        let participant = Participant::new(nickname);
        let participant_id = participant.id();
        info!(participant_id = ?participant_id, nickname = %participant.nickname(), "Participant joining");

        // Bound before matchmaking so the joined/waiting events have somewhere to go.
        self.outbound.bind(participant_id).await;
        match self.matchmaking.join(participant).await {
            Ok(ticket) => self.ticket = Some(ticket),
            Err(e) => {
                warn!(participant_id = ?participant_id, error = %e, "Join failed");
                self.outbound.unbind(participant_id).await;
            }
        }
    }

    pub(crate) async fn submit(
        &self,
        session_id: SessionId,
        word: String,
    ) {
        match self.ticket {
            Some(ticket) => {
                self.coordinator
                    .submit_word(session_id, ticket.participant_id, word)
                    .await;
            }
            None => debug!(session_id = ?session_id, "Submit before join ignored"),
        }
    }

    /// Connection closed: leave the session, then drop the binding.
    pub(crate) async fn leave(self) {
        match self.ticket {
            Some(ticket) => {
                info!(participant_id = ?ticket.participant_id, session_id = ?ticket.session_id, "Participant disconnected");
                self.coordinator.disconnect(ticket.session_id, ticket.participant_id).await;
                self.outbound.unbind(ticket.participant_id).await;
            }
            None => info!("Connection closed"),
        }
    }
}
