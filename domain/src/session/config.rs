use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    AwaitingOpponent,
    RoundInProgress,
    Finished,
}

#[derive(Clone, Debug)]
pub struct RoundConfig {
    pub deadline: Duration,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            deadline: Duration::from_secs(15),
        }
    }
}
