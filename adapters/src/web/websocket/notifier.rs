use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use futures::SinkExt;
use futures::stream::SplitSink;
use tokio::sync::{Mutex as TokioMutex, RwLock};
use tracing::{debug, warn};

use application::ports::out_::SessionNotifier;
use domain::{ParticipantId, SessionEvent};

pub(crate) type WebSocketSender = SplitSink<WebSocket, Message>;
pub(crate) type SharedSender = Arc<TokioMutex<WebSocketSender>>;

/// Routes session events to the socket each participant joined from.
pub struct WebSocketNotifier {
    connections: RwLock<HashMap<ParticipantId, SharedSender>>,
}

impl WebSocketNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
        }
    }

    pub(crate) async fn bind(
        &self,
        participant_id: ParticipantId,
        sender: SharedSender,
    ) {
        self.connections.write().await.insert(participant_id, sender);
    }

    pub(crate) async fn unbind(
        &self,
        participant_id: ParticipantId,
    ) {
        self.connections.write().await.remove(&participant_id);
    }

    async fn send_to_participant(
        &self,
        participant_id: ParticipantId,
        message: &str,
    ) {
        let sender = self.connections.read().await.get(&participant_id).cloned();
        let Some(sender) = sender else {
            debug!(participant_id = ?participant_id, "No connection bound, dropping message");
            return;
        };
        debug!(participant_id = ?participant_id, message = %message, "-> Sending");
        if let Err(e) = sender.lock().await.send(Message::Text(message.into())).await {
            debug!(participant_id = ?participant_id, error = %e, "Send failed");
        }
    }
}

impl Default for WebSocketNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionNotifier for WebSocketNotifier {
    async fn notify_participant(
        &self,
        participant_id: ParticipantId,
        event: SessionEvent,
    ) {
        match serde_json::to_string(&event) {
            Ok(message) => self.send_to_participant(participant_id, &message).await,
            Err(e) => warn!(participant_id = ?participant_id, error = %e, "Failed to encode event"),
        }
    }
}
