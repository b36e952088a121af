mod clock;
mod session;

pub use clock::{Clock, DeadlineCallback};
pub use session::{SessionNotifier, SessionServiceError};
