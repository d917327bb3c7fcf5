//! Periodic session refresh scheduler.
//!
//! Parked translation pages go stale: sessions expire, the page drifts,
//! memory accumulates. The scheduler recycles the whole browser session on
//! a fixed interval so the pool keeps serving fresh tabs without anyone
//! calling refresh by hand.
//!
//! The scheduler is a single tokio task owned by the pool. It is started
//! by [`TabPool::init()`](crate::TabPool::init) and cancelled by
//! [`TabPool::shutdown()`](crate::TabPool::shutdown); cancellation waits
//! out an in-flight recycle rather than interrupting it.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::pool::TabPoolInner;

/// Handle to the background recycle timer.
pub(crate) struct RefreshScheduler {
    /// Cancellation signal; sending flips the loop into its exit branch.
    cancel_tx: watch::Sender<bool>,

    /// The timer task itself.
    task: JoinHandle<()>,
}

impl RefreshScheduler {
    /// Spawn the timer task.
    ///
    /// The first recycle fires one full `interval` after start, not
    /// immediately; initialization has just provisioned fresh tabs.
    pub(crate) fn start(inner: Arc<TabPoolInner>, interval: Duration) -> Self {
        let (cancel_tx, mut cancel_rx) = watch::channel(false);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // interval() yields its first tick immediately; consume it so
            // the first recycle waits a full period.
            ticker.tick().await;

            log::debug!("Refresh scheduler running (interval {:?})", interval);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        inner.recycle().await;
                    }
                    result = cancel_rx.changed() => {
                        if result.is_err() || *cancel_rx.borrow() {
                            log::debug!("Refresh scheduler stopping");
                            break;
                        }
                    }
                }
            }
        });

        Self { cancel_tx, task }
    }

    /// Cancel the scheduler and wait for the task to finish.
    ///
    /// An in-flight recycle completes before this returns, so callers can
    /// rely on no recycle running afterwards.
    pub(crate) async fn cancel(self) {
        let _ = self.cancel_tx.send(true);
        if let Err(e) = self.task.await {
            if e.is_panic() {
                log::error!("Refresh scheduler panicked: {}", e);
            }
        }
    }

    /// Abort the task without waiting.
    ///
    /// Used from `Drop` where awaiting is impossible. May cut a recycle
    /// short; the session is torn down by handle drops either way.
    pub(crate) fn abort(self) {
        let _ = self.cancel_tx.send(true);
        self.task.abort();
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TabPoolConfigBuilder;
    use crate::driver::mock::MockSessionDriver;

    fn quick_inner(driver: MockSessionDriver) -> Arc<TabPoolInner> {
        let config = TabPoolConfigBuilder::new()
            .target_size(1)
            .settle_delay(Duration::ZERO)
            .build()
            .unwrap();
        TabPoolInner::new(config, Box::new(driver))
    }

    /// Verifies that the scheduler recycles on its interval.
    #[tokio::test]
    async fn test_scheduler_fires() {
        let driver = MockSessionDriver::new();
        let inner = quick_inner(driver.clone());
        inner.initialize().await.unwrap();
        assert_eq!(driver.open_count(), 1);

        let scheduler = RefreshScheduler::start(Arc::clone(&inner), Duration::from_millis(20));
        tokio::time::sleep(Duration::from_millis(70)).await;
        scheduler.cancel().await;

        assert!(
            driver.open_count() >= 2,
            "at least one recycle should have reopened the session"
        );
    }

    /// Verifies that cancel stops the timer before its first fire.
    #[tokio::test]
    async fn test_scheduler_cancel_before_fire() {
        let driver = MockSessionDriver::new();
        let inner = quick_inner(driver.clone());
        inner.initialize().await.unwrap();

        let scheduler = RefreshScheduler::start(Arc::clone(&inner), Duration::from_secs(3600));
        scheduler.cancel().await;

        assert_eq!(driver.open_count(), 1, "no recycle should have run");
    }
}
