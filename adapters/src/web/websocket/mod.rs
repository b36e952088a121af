mod handler;
mod notifier;
mod seat;

pub use handler::{IncomingMessage, handle_connection};
pub use notifier::WebSocketNotifier;
