//! Periodic refresh with cancellation.
//!
//! A [`Poller`] runs a task on a fixed interval (first run immediately) and
//! hands each result to a sink. A [`PollHandle`] stops it from anywhere.
//! Cancelling does not abort a fetch that is already running; its result is
//! discarded when it arrives, so the sink never sees data after
//! cancellation.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
struct PollSignal {
    cancelled: AtomicBool,
    notify: Notify,
}

/// Cloneable handle that cancels a poller.
#[derive(Debug, Clone, Default)]
pub struct PollHandle {
    signal: Arc<PollSignal>,
}

impl PollHandle {
    /// Create a handle that is not cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop the poller. A waiting poller wakes immediately.
    pub fn cancel(&self) {
        if !self.signal.cancelled.swap(true, Ordering::SeqCst) {
            debug!("Poll cancellation requested");
        }
        self.signal.notify.notify_waiters();
    }

    /// Whether `cancel` has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.signal.cancelled.load(Ordering::SeqCst)
    }

    /// Cancel when `signal` resolves successfully, e.g.
    /// `tokio::signal::ctrl_c()`. If the signal cannot be installed the
    /// failure is logged and the poller keeps running.
    pub async fn cancel_on<S>(self, signal: S)
    where
        S: Future<Output = std::io::Result<()>>,
    {
        match signal.await {
            Ok(()) => {
                info!("Interrupted, stopping refresh");
                self.cancel();
            }
            Err(e) => warn!(error = %e, "Cannot listen for interrupt; refresh continues"),
        }
    }

    /// Resolves once the handle is cancelled.
    pub async fn cancelled(&self) {
        loop {
            // Register before checking so a cancel in between is not missed.
            let notified = self.signal.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}

/// Counters from a finished poll loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PollStats {
    /// Task runs started.
    pub runs: u64,
    /// Results handed to the sink.
    pub delivered: u64,
    /// Results dropped because they arrived after cancellation.
    pub discarded: u64,
}

/// Runs a task on a fixed interval until cancelled.
#[derive(Debug)]
pub struct Poller {
    name: &'static str,
    period: Duration,
    handle: PollHandle,
}

impl Poller {
    /// Create a poller. `name` only appears in logs.
    #[must_use]
    pub fn new(name: &'static str, period: Duration) -> Self {
        Self {
            name,
            period,
            handle: PollHandle::new(),
        }
    }

    /// Handle that cancels this poller.
    #[must_use]
    pub fn handle(&self) -> PollHandle {
        self.handle.clone()
    }

    /// Interval between runs.
    #[must_use]
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Run until cancelled. Each result replaces the previous one in the
    /// sink; nothing is merged.
    pub async fn run<T, F, Fut, S>(self, mut task: F, mut sink: S) -> PollStats
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = T>,
        S: FnMut(T),
    {
        let mut stats = PollStats::default();
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            poller = self.name,
            period_secs = self.period.as_secs_f64(),
            "Polling started"
        );

        loop {
            tokio::select! {
                biased;
                () = self.handle.cancelled() => break,
                _ = ticker.tick() => {}
            }

            stats.runs += 1;
            let result = task().await;

            if self.handle.is_cancelled() {
                warn!(poller = self.name, "Result arrived after cancellation, discarding");
                stats.discarded += 1;
                break;
            }

            sink(result);
            stats.delivered += 1;
            debug!(poller = self.name, run = stats.runs, "Poll result delivered");
        }

        info!(
            poller = self.name,
            runs = stats.runs,
            delivered = stats.delivered,
            "Polling stopped"
        );
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_handle_cancel() {
        let handle = PollHandle::new();
        assert!(!handle.is_cancelled());

        handle.cancel();
        assert!(handle.is_cancelled());

        // Idempotent.
        handle.cancel();
        assert!(handle.is_cancelled());
    }

    #[test]
    fn test_handle_clone_shares_signal() {
        let a = PollHandle::new();
        let b = a.clone();
        a.cancel();
        assert!(b.is_cancelled());
    }

    #[test]
    fn test_poller_period() {
        let poller = Poller::new("home", Duration::from_secs(48));
        assert_eq!(poller.period(), Duration::from_secs(48));
        assert!(!poller.handle().is_cancelled());
    }

    #[tokio::test]
    async fn test_cancel_on_signal() {
        let handle = PollHandle::new();
        handle.clone().cancel_on(async { Ok(()) }).await;
        assert!(handle.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancel_on_failed_signal_keeps_polling() {
        let poller = Poller::new("test", Duration::from_millis(5));
        let handle = poller.handle();

        handle
            .clone()
            .cancel_on(async { Err(std::io::Error::other("no signal handler")) })
            .await;
        assert!(!handle.is_cancelled());

        let mut runs = 0;
        let stats = poller
            .run(
                || async {},
                |()| {
                    runs += 1;
                    if runs == 2 {
                        handle.cancel();
                    }
                },
            )
            .await;
        assert_eq!(stats.delivered, 2);
    }

    #[tokio::test]
    async fn test_cancelled_resolves_after_cancel() {
        let handle = PollHandle::new();
        let waiter = handle.clone();
        let task = tokio::spawn(async move { waiter.cancelled().await });

        tokio::task::yield_now().await;
        handle.cancel();

        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_delivers_until_cancelled() {
        let poller = Poller::new("test", Duration::from_millis(5));
        let handle = poller.handle();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink_seen = Arc::clone(&seen);
        let mut counter = 0;

        let stats = poller
            .run(
                || {
                    counter += 1;
                    let value = counter;
                    async move { value }
                },
                |value| {
                    sink_seen.lock().unwrap().push(value);
                    if value == 3 {
                        handle.cancel();
                    }
                },
            )
            .await;

        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);
        assert_eq!(stats.runs, 3);
        assert_eq!(stats.delivered, 3);
        assert_eq!(stats.discarded, 0);
    }

    #[tokio::test]
    async fn test_cancel_before_start_runs_nothing() {
        let poller = Poller::new("test", Duration::from_millis(5));
        poller.handle().cancel();

        let stats = poller.run(|| async { 1 }, |_| panic!("sink called")).await;

        assert_eq!(stats, PollStats::default());
    }

    #[tokio::test]
    async fn test_late_result_is_discarded() {
        let poller = Poller::new("test", Duration::from_millis(5));
        let handle = poller.handle();

        let stats = poller
            .run(
                || {
                    let handle = handle.clone();
                    async move {
                        // Torn down while the fetch was in flight.
                        handle.cancel();
                        "stale"
                    }
                },
                |_| panic!("stale result delivered"),
            )
            .await;

        assert_eq!(stats.runs, 1);
        assert_eq!(stats.delivered, 0);
        assert_eq!(stats.discarded, 1);
    }

    #[tokio::test]
    async fn test_cancel_wakes_idle_poller() {
        let poller = Poller::new("test", Duration::from_secs(3600));
        let handle = poller.handle();
        let runner = tokio::spawn(poller.run(|| async {}, |()| {}));

        tokio::time::sleep(Duration::from_millis(20)).await;
        handle.cancel();

        let stats = tokio::time::timeout(Duration::from_secs(1), runner)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stats.delivered, 1);
    }
}
