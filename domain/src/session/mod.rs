mod action;
mod config;
mod effect;
mod error;
mod event;
mod state;

#[cfg(test)]
mod tests;

pub use action::SessionAction;
pub use config::{RoundConfig, SessionStatus};
pub use effect::{SessionEffect, SessionOutcome};
pub use error::SessionError;
pub use event::{RoundRecord, SessionEvent, SubmittedWord};
pub use state::SessionState;
