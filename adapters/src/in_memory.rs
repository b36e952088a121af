use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError, RwLock};
use std::time::Duration;

use async_trait::async_trait;

use application::ports::out_::{Clock, DeadlineCallback, SessionNotifier};
use domain::{ParticipantId, SessionEvent, TimerId};

/// Records every outbound event instead of delivering it.
pub struct InMemoryNotifier {
    events: RwLock<Vec<(ParticipantId, SessionEvent)>>,
}

#[async_trait]
impl SessionNotifier for InMemoryNotifier {
    async fn notify_participant(
        &self,
        participant_id: ParticipantId,
        event: SessionEvent,
    ) {
        self.events
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((participant_id, event));
    }
}

impl InMemoryNotifier {
    pub fn new() -> Self {
        Self {
            events: RwLock::new(Vec::new()),
        }
    }

    pub fn get_events(&self) -> Vec<(ParticipantId, SessionEvent)> {
        self.events.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn events_for(
        &self,
        participant_id: ParticipantId,
    ) -> Vec<SessionEvent> {
        self.events
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|(pid, _)| *pid == participant_id)
            .map(|(_, event)| event.clone())
            .collect()
    }

    /// Drains what has been recorded so far.
    pub fn take_events(&self) -> Vec<(ParticipantId, SessionEvent)> {
        std::mem::take(&mut *self.events.write().unwrap_or_else(PoisonError::into_inner))
    }
}

impl Default for InMemoryNotifier {
    fn default() -> Self {
        Self::new()
    }
}

struct PendingTimer {
    due: Duration,
    timer: TimerId,
    callback: DeadlineCallback,
}

/// Virtual time. Nothing fires until `advance` moves the clock past a deadline.
pub struct ManualClock {
    now: Mutex<Duration>,
    next_id: AtomicU64,
    pending: Mutex<Vec<PendingTimer>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Duration::ZERO),
            next_id: AtomicU64::new(1),
            pending: Mutex::new(Vec::new()),
        }
    }

    pub fn now(&self) -> Duration {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn pending(&self) -> Vec<TimerId> {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|p| p.timer)
            .collect()
    }

    /// Moves time forward, firing due timers in deadline order. Timers armed by
    /// a callback fire too if they fall due within the same advance.
    pub async fn advance(
        &self,
        by: Duration,
    ) {
        let target = self.now() + by;
        while let Some(due) = self.pop_due(target) {
            *self.now.lock().unwrap_or_else(PoisonError::into_inner) = due.due;
            (due.callback)(due.timer).await;
        }
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = target;
    }

    fn pop_due(
        &self,
        target: Duration,
    ) -> Option<PendingTimer> {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        let idx = pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due <= target)
            .min_by_key(|(_, p)| (p.due, p.timer))
            .map(|(idx, _)| idx)?;
        Some(pending.remove(idx))
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn schedule(
        &self,
        delay: Duration,
        callback: DeadlineCallback,
    ) -> TimerId {
        let timer = TimerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let due = self.now() + delay;
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(PendingTimer { due, timer, callback });
        timer
    }

    fn cancel(
        &self,
        timer: TimerId,
    ) {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|p| p.timer != timer);
    }
}
