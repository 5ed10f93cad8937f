// src/menu_sync/utils/timeout.rs
use crate::error::SyncError;
use futures::future::{self, Either, LocalBoxFuture};
use std::future::Future;
use std::time::Duration;

/// Source of sleeps for the host runtime (an event loop, a canister timer, a test).
pub trait Timer {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()>;
}

/// Races `call` against `timer` when both a timer and a limit are given.
///
/// # Errors
///
/// Returns `SyncError::Timeout` if the sleep finishes first, otherwise whatever `call` returns.
pub async fn with_timeout<T, F>(
    timer: Option<&dyn Timer>,
    limit: Option<Duration>,
    call: F,
) -> Result<T, SyncError>
where
    F: Future<Output = Result<T, SyncError>>,
{
    let (Some(timer), Some(limit)) = (timer, limit) else {
        return call.await;
    };

    let sleep = timer.sleep(limit);
    futures::pin_mut!(call);
    match future::select(call, sleep).await {
        Either::Left((result, _)) => result,
        Either::Right(((), _)) => Err(SyncError::Timeout(limit.as_millis() as u64)),
    }
}
