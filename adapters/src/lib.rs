mod in_memory;
mod tokio_clock;
mod web;


pub use in_memory::{InMemoryNotifier, ManualClock};
pub use tokio_clock::TokioClock;
pub use web::{AppState, HealthResponse, IncomingMessage, WebSocketNotifier, create_app_state, handle_connection, health};
