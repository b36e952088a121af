use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::StreamExt;
use futures::stream::SplitStream;
use serde::Deserialize;
use tokio::sync::Mutex as TokioMutex;
use tracing::{debug, info, warn};

use domain::SessionId;

use super::notifier::SharedSender;
use super::seat::{Seat, SocketOutbound};
use crate::web::state::AppState;

#[derive(Debug, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IncomingMessage {
    Join { nickname: String },
    Submit { session_id: SessionId, word: String },
}

pub async fn handle_connection(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| async move {
        info!("Connection opened");

        let (sender, receiver) = socket.split();
        let sender: SharedSender = Arc::new(TokioMutex::new(sender));

        handle_messages(sender, receiver, state).await;
    })
}

async fn handle_messages(
    sender: SharedSender,
    mut receiver: SplitStream<WebSocket>,
    state: Arc<AppState>,
) {
    let outbound = SocketOutbound {
        notifier: Arc::clone(&state.notifier),
        sender,
    };
    let mut seat = Seat::new(&state.coordinator, &state.matchmaking_service, outbound);

    while let Some(Ok(message)) = receiver.next().await {
        if let Message::Text(text) = message {
            debug!(seat = ?seat.ticket(), message = %text, "<- Received");

            match serde_json::from_str::<IncomingMessage>(&text) {
                Ok(IncomingMessage::Join { nickname }) => seat.join(nickname).await,
                Ok(IncomingMessage::Submit { session_id, word }) => seat.submit(session_id, word).await,
                Err(e) => {
                    warn!(error = %e, "Failed to parse message");
                }
            }
        }
    }

    seat.leave().await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_join() {
        let msg: IncomingMessage = serde_json::from_str(r#"{"type":"join","nickname":"A"}"#).unwrap();
        assert_eq!(
            msg,
            IncomingMessage::Join {
                nickname: "A".to_string()
            }
        );
    }

    #[test]
    fn parses_submit() {
        let session_id = SessionId::new();
        let text = format!(r#"{{"type":"submit","session_id":"{}","word":"apple"}}"#, session_id.0);
        let msg: IncomingMessage = serde_json::from_str(&text).unwrap();
        assert_eq!(
            msg,
            IncomingMessage::Submit {
                session_id,
                word: "apple".to_string()
            }
        );
    }

    #[test]
    fn rejects_unknown_type() {
        assert!(serde_json::from_str::<IncomingMessage>(r#"{"type":"leave"}"#).is_err());
    }
}
