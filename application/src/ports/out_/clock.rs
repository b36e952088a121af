use std::time::Duration;

use futures::future::BoxFuture;

use domain::TimerId;

/// Runs once when the timer it was scheduled with elapses. Receives that
/// timer's id so the owner can tell a live deadline from a superseded one.
pub type DeadlineCallback = Box<dyn FnOnce(TimerId) -> BoxFuture<'static, ()> + Send>;

pub trait Clock: Send + Sync {
    fn schedule(
        &self,
        delay: Duration,
        callback: DeadlineCallback,
    ) -> TimerId;

    /// Idempotent. Cancelling a fired or already cancelled timer does nothing.
    fn cancel(
        &self,
        timer: TimerId,
    );
}
