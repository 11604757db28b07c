//! Poll loops on the page's event loop.
//!
//! Same contract as the core's tokio driver: wait, refresh, sleep for the
//! next interval (or until woken), stop once the handle is disposed. Published values are
//! pushed into the view through `on_update`.

use gloo_timers::future::TimeoutFuture;
use lazorkit_demo::{DemoError, DisposeToken, PollHandle, Poller, RefreshOutcome, Wakeups};
use leptos::spawn_local;
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

fn millis(d: Duration) -> u32 {
    u32::try_from(d.as_millis()).unwrap_or(u32::MAX)
}

/// Drive `poller` with `spawn_local`. Dispose the returned handle (the cards
/// do it from `on_cleanup`) to stop the loop.
pub fn spawn_local_poller<T, F, Fut, I, U>(
    poller: Rc<Poller<T>>,
    initial_delay: Duration,
    next_interval: I,
    fetch: F,
    on_update: U,
) -> PollHandle
where
    T: Clone + 'static,
    F: Fn() -> Fut + 'static,
    Fut: Future<Output = Result<T, DemoError>> + 'static,
    I: Fn() -> Duration + 'static,
    U: Fn(T) + 'static,
{
    spawn_local_poller_with_wakeups(
        poller,
        initial_delay,
        next_interval,
        fetch,
        on_update,
        Wakeups::new(),
    )
}

/// Like [`spawn_local_poller`], but wakers taken from `wakeups` end the
/// current sleep early. Disposal wakes the loop too, so it stops at once
/// instead of after its pending timeout.
pub fn spawn_local_poller_with_wakeups<T, F, Fut, I, U>(
    poller: Rc<Poller<T>>,
    initial_delay: Duration,
    next_interval: I,
    fetch: F,
    on_update: U,
    mut wakeups: Wakeups,
) -> PollHandle
where
    T: Clone + 'static,
    F: Fn() -> Fut + 'static,
    Fut: Future<Output = Result<T, DemoError>> + 'static,
    I: Fn() -> Duration + 'static,
    U: Fn(T) + 'static,
{
    let token = DisposeToken::new();
    let loop_token = token.clone();
    let on_dispose = wakeups.waker();

    spawn_local(async move {
        wakeups
            .sleep_or_wake(TimeoutFuture::new(millis(initial_delay)))
            .await;
        while !loop_token.is_disposed() {
            let outcome = poller.refresh(&loop_token, &fetch).await;
            if outcome == RefreshOutcome::Updated {
                if let Some(value) = poller.latest() {
                    on_update(value);
                }
            }
            log::trace!("{} poll: {:?}", poller.name(), outcome);
            wakeups
                .sleep_or_wake(TimeoutFuture::new(millis(next_interval())))
                .await;
        }
        log::debug!("{} poller stopped", poller.name());
    });

    PollHandle::with_abort(token, move || on_dispose.wake())
}

/// One immediate refresh outside the loop, e.g. right after a transfer.
/// Throttling and single-flight still apply.
pub fn refresh_now<T, F, Fut, U>(poller: Rc<Poller<T>>, token: DisposeToken, fetch: F, on_update: U)
where
    T: Clone + 'static,
    F: FnOnce() -> Fut + 'static,
    Fut: Future<Output = Result<T, DemoError>> + 'static,
    U: FnOnce(T) + 'static,
{
    spawn_local(async move {
        if poller.refresh(&token, fetch).await == RefreshOutcome::Updated {
            if let Some(value) = poller.latest() {
                on_update(value);
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_millis_saturates() {
        assert_eq!(millis(Duration::from_millis(300)), 300);
        assert_eq!(millis(Duration::from_secs(u64::MAX)), u32::MAX);
    }
}
