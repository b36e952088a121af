use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::task::AbortHandle;

use application::ports::out_::{Clock, DeadlineCallback};
use domain::TimerId;

type Timers = Arc<Mutex<HashMap<TimerId, AbortHandle>>>;

/// Wall-clock deadlines, one sleeping task per timer.
pub struct TokioClock {
    next_id: AtomicU64,
    timers: Timers,
}

impl TokioClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            timers: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TokioClock {
    fn schedule(
        &self,
        delay: Duration,
        callback: DeadlineCallback,
    ) -> TimerId {
        let timer = TimerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let timers = Arc::clone(&self.timers);

        // Held until the abort handle is stored so the task can't fire unregistered.
        let mut registered = self.timers.lock().unwrap_or_else(PoisonError::into_inner);
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let live = timers
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(&timer)
                .is_some();
            if live {
                callback(timer).await;
            }
        });
        registered.insert(timer, task.abort_handle());
        timer
    }

    fn cancel(
        &self,
        timer: TimerId,
    ) {
        let handle = self
            .timers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&timer);
        if let Some(handle) = handle {
            handle.abort();
        }
    }
}
