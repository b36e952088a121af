use std::sync::Arc;

use application::SessionRegistry;
use application::ports::in_::{MatchmakingService, RoundCoordinator};
use application::ports::out_::{Clock, SessionNotifier};
use domain::RoundConfig;

use super::websocket::WebSocketNotifier;
use crate::TokioClock;

pub struct AppState {
    pub notifier: Arc<WebSocketNotifier>,
    pub coordinator: RoundCoordinator,
    pub matchmaking_service: MatchmakingService,
}

impl AppState {
    pub fn new(
        notifier: Arc<WebSocketNotifier>,
        coordinator: RoundCoordinator,
        matchmaking_service: MatchmakingService,
    ) -> Self {
        Self {
            notifier,
            coordinator,
            matchmaking_service,
        }
    }
}

pub fn create_app_state(config: RoundConfig) -> Arc<AppState> {
    let notifier = Arc::new(WebSocketNotifier::new());
    let session_notifier: Arc<dyn SessionNotifier> = notifier.clone();
    let clock: Arc<dyn Clock> = Arc::new(TokioClock::new());

    let coordinator = RoundCoordinator::new(SessionRegistry::new(), session_notifier, clock);
    let matchmaking_service = MatchmakingService::new(coordinator.clone(), config);

    Arc::new(AppState::new(notifier, coordinator, matchmaking_service))
}
