mod matchmaking_service;
mod round_coordinator;

pub use matchmaking_service::{JoinTicket, MatchmakingService};
pub use round_coordinator::RoundCoordinator;
