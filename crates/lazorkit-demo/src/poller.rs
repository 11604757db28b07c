//! Polling coordinator.
//!
//! A [`Poller`] wraps one externally sourced value (a balance, the token
//! list, confirmation status) with a single-flight guard and a minimum
//! interval between successful runs. Failures are logged and the previously
//! published value stays in place.
//!
//! Drivers decide *when* to call [`Poller::refresh`]: [`spawn_poller`] on
//! tokio, or the browser app's `spawn_local` loop. Both hand out a
//! [`PollHandle`] whose disposal stops the loop and discards late results.

use crate::clock::Clock;
use crate::error::DemoError;
use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::future::{self, Either};
use futures::StreamExt;
use std::future::Future;
use std::pin::pin;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            tracing::error!("poller mutex poisoned, recovering");
            poisoned.into_inner()
        }
    }
}

/// Latest successfully fetched value of a source.
pub struct Published<T> {
    value: Mutex<Option<T>>,
    version: AtomicU64,
}

impl<T: Clone> Published<T> {
    pub fn new() -> Self {
        Self {
            value: Mutex::new(None),
            version: AtomicU64::new(0),
        }
    }

    pub fn get(&self) -> Option<T> {
        lock(&self.value).clone()
    }

    /// Bumped on every replacement; lets views skip redundant redraws.
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::SeqCst)
    }

    fn replace(&self, value: T) {
        *lock(&self.value) = Some(value);
        self.version.fetch_add(1, Ordering::SeqCst);
    }

    /// Forget the value, e.g. when the wallet disconnects.
    pub fn clear(&self) {
        *lock(&self.value) = None;
        self.version.fetch_add(1, Ordering::SeqCst);
    }
}

impl<T: Clone> Default for Published<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Disposal flag captured by every scheduled refresh.
#[derive(Debug, Clone, Default)]
pub struct DisposeToken(Arc<AtomicBool>);

impl DisposeToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_disposed(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn dispose(&self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

/// What a single [`Poller::refresh`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Fetched and published a new value.
    Updated,
    /// Another refresh of this source is still running.
    SkippedInFlight,
    /// The last success was less than the minimum interval ago.
    Throttled,
    /// The fetch failed; the old value is kept.
    Failed,
    /// The handle was disposed while the fetch was running.
    Discarded,
}

#[derive(Debug, Default)]
struct GateState {
    in_flight: bool,
    last_success_ms: Option<u64>,
}

/// Clears `in_flight` even if the refresh future is dropped mid-await.
struct InFlight<'a>(&'a Mutex<GateState>);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        lock(self.0).in_flight = false;
    }
}

/// Single-flight, throttled refresher for one data source.
pub struct Poller<T> {
    name: &'static str,
    min_interval: Duration,
    state: Mutex<GateState>,
    published: Arc<Published<T>>,
    clock: Arc<dyn Clock>,
}

impl<T: Clone> Poller<T> {
    pub fn new(name: &'static str, min_interval: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            name,
            min_interval,
            state: Mutex::new(GateState::default()),
            published: Arc::new(Published::new()),
            clock,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn published(&self) -> Arc<Published<T>> {
        Arc::clone(&self.published)
    }

    pub fn latest(&self) -> Option<T> {
        self.published.get()
    }

    pub fn is_in_flight(&self) -> bool {
        lock(&self.state).in_flight
    }

    /// Run `fetch` unless a refresh is already running or the last success
    /// was too recent. The result is published only if `token` is still live
    /// when the fetch completes.
    pub async fn refresh<F, Fut>(&self, token: &DisposeToken, fetch: F) -> RefreshOutcome
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, DemoError>>,
    {
        if token.is_disposed() {
            return RefreshOutcome::Discarded;
        }

        let started_ms = self.clock.now_ms();
        {
            let mut state = lock(&self.state);
            if state.in_flight {
                tracing::debug!(source = self.name, "refresh already in flight");
                return RefreshOutcome::SkippedInFlight;
            }
            if let Some(last) = state.last_success_ms {
                let min = u64::try_from(self.min_interval.as_millis()).unwrap_or(u64::MAX);
                if started_ms.saturating_sub(last) < min {
                    return RefreshOutcome::Throttled;
                }
            }
            state.in_flight = true;
        }

        let result = {
            let _guard = InFlight(&self.state);
            fetch().await
        };

        if token.is_disposed() {
            tracing::debug!(source = self.name, "discarding result for disposed poller");
            return RefreshOutcome::Discarded;
        }

        match result {
            Ok(value) => {
                lock(&self.state).last_success_ms = Some(started_ms);
                self.published.replace(value);
                RefreshOutcome::Updated
            }
            Err(e) => {
                tracing::warn!(source = self.name, error = %e, "refresh failed, keeping last value");
                RefreshOutcome::Failed
            }
        }
    }
}

/// How long a driver waits between ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    Fixed(Duration),
    /// `short` while there is outstanding work, `long` otherwise.
    Adaptive { short: Duration, long: Duration },
}

impl Cadence {
    pub fn interval(&self, busy: bool) -> Duration {
        match *self {
            Cadence::Fixed(every) => every,
            Cadence::Adaptive { short, long } => {
                if busy {
                    short
                } else {
                    long
                }
            }
        }
    }
}

/// Owner of a running poll loop. Disposing (or dropping) it cancels the
/// timer and makes any in-flight result a no-op.
#[must_use = "dropping the handle stops the poller"]
pub struct PollHandle {
    token: DisposeToken,
    abort: Option<Box<dyn FnOnce() + Send>>,
}

impl PollHandle {
    pub fn new(token: DisposeToken) -> Self {
        Self { token, abort: None }
    }

    /// Also run `abort` on disposal (e.g. abort the driving task).
    pub fn with_abort<F>(token: DisposeToken, abort: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            token,
            abort: Some(Box::new(abort)),
        }
    }

    pub fn token(&self) -> DisposeToken {
        self.token.clone()
    }

    pub fn is_disposed(&self) -> bool {
        self.token.is_disposed()
    }

    pub fn dispose(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.token.dispose();
        if let Some(abort) = self.abort.take() {
            abort();
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Cuts a driver's current sleep short so it refreshes and re-reads its
/// cadence right away. Cheap to clone; waking a stopped driver is a no-op.
#[derive(Debug, Clone)]
pub struct PollWaker(UnboundedSender<()>);

impl PollWaker {
    pub fn wake(&self) {
        let _ = self.0.unbounded_send(());
    }
}

/// Receiving end of [`PollWaker`], owned by a poll loop.
#[derive(Debug)]
pub struct Wakeups {
    tx: UnboundedSender<()>,
    rx: UnboundedReceiver<()>,
}

impl Wakeups {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded();
        Self { tx, rx }
    }

    pub fn waker(&self) -> PollWaker {
        PollWaker(self.tx.clone())
    }

    /// Await `sleep` unless a wake arrives first. Returns `true` when woken.
    pub async fn sleep_or_wake<S>(&mut self, sleep: S) -> bool
    where
        S: Future<Output = ()>,
    {
        let sleep = pin!(sleep);
        match future::select(sleep, self.rx.next()).await {
            Either::Left(((), _)) => false,
            Either::Right(_) => true,
        }
    }
}

impl Default for Wakeups {
    fn default() -> Self {
        Self::new()
    }
}

/// Drive `poller` on the tokio runtime.
///
/// Waits `initial_delay`, then refreshes and sleeps for `next_interval()`
/// in a loop until the returned handle is disposed.
#[cfg(feature = "full")]
pub fn spawn_poller<T, F, Fut, I>(
    poller: Arc<Poller<T>>,
    initial_delay: Duration,
    next_interval: I,
    fetch: F,
) -> PollHandle
where
    T: Clone + Send + Sync + 'static,
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, DemoError>> + Send + 'static,
    I: Fn() -> Duration + Send + Sync + 'static,
{
    spawn_poller_with_wakeups(poller, initial_delay, next_interval, fetch, Wakeups::new())
}

/// Like [`spawn_poller`], but any [`PollWaker`] taken from `wakeups` ends the
/// current sleep early, e.g. when a new pending entry needs the short
/// cadence now rather than after the long one.
#[cfg(feature = "full")]
pub fn spawn_poller_with_wakeups<T, F, Fut, I>(
    poller: Arc<Poller<T>>,
    initial_delay: Duration,
    next_interval: I,
    fetch: F,
    mut wakeups: Wakeups,
) -> PollHandle
where
    T: Clone + Send + Sync + 'static,
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, DemoError>> + Send + 'static,
    I: Fn() -> Duration + Send + Sync + 'static,
{
    let token = DisposeToken::new();
    let loop_token = token.clone();

    let task = tokio::spawn(async move {
        tokio::time::sleep(initial_delay).await;
        while !loop_token.is_disposed() {
            let outcome = poller.refresh(&loop_token, &fetch).await;
            tracing::trace!(source = poller.name(), ?outcome, "poll tick");
            if wakeups.sleep_or_wake(tokio::time::sleep(next_interval())).await {
                tracing::trace!(source = poller.name(), "poll woken early");
            }
        }
    });

    PollHandle::with_abort(token, move || task.abort())
}
