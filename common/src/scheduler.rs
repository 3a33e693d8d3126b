// One-shot refresh trigger
//
// `RefreshScheduler::arm` captures the reference instant, computes the
// aligned target, and spawns a single timer task that requests a reload
// when it fires. Arming twice creates two independent triggers; nothing
// is shared between them and neither can be cancelled.

use crate::clock::Clock;
use crate::errors::RefreshError;
use crate::refresh::{describe_refresh, next_refresh_at, refresh_delay};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Local};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info, instrument};

/// Capability that performs the reload of the displayed page.
///
/// `bypass_cache` forces a re-fetch from the origin rather than serving
/// a cached copy.
#[async_trait]
pub trait ReloadStrategy: Send + Sync {
    async fn reload(&self, bypass_cache: bool) -> Result<(), RefreshError>;
}

/// Schedules one refresh per invocation of `arm`
pub struct RefreshScheduler {
    clock: Arc<dyn Clock>,
    reload: Arc<dyn ReloadStrategy>,
}

/// Inspectable handle for an armed refresh
pub struct RefreshHandle {
    target: DateTime<Local>,
    delay: Duration,
    task: JoinHandle<()>,
}

impl RefreshHandle {
    /// Wall-clock instant the refresh fires at
    pub fn target(&self) -> DateTime<Local> {
        self.target
    }

    /// Delay between arming and firing
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Wait for the trigger to fire and the reload request to complete
    pub async fn fired(self) {
        let _ = self.task.await;
    }
}

impl RefreshScheduler {
    pub fn new(clock: Arc<dyn Clock>, reload: Arc<dyn ReloadStrategy>) -> Self {
        Self { clock, reload }
    }

    /// Arm a one-shot refresh for the next aligned boundary.
    ///
    /// Returns immediately after registering the timer; the reload runs
    /// as an independently scheduled task. Fire-once with no retry: a
    /// failed reload is logged and forgotten, and the next page load
    /// recomputes everything from scratch.
    #[instrument(skip(self))]
    pub fn arm(&self) -> Result<RefreshHandle, RefreshError> {
        let reference = self.clock.now();
        let target = next_refresh_at(&reference)?;
        let delay = refresh_delay(&reference, &target)?;

        info!(
            delay_ms = delay.num_milliseconds(),
            "{}",
            describe_refresh(delay, &target)
        );

        let sleep_for = delay.to_std().map_err(|_| RefreshError::NonPositiveDelay {
            delay_ms: delay.num_milliseconds(),
        })?;
        let reload = Arc::clone(&self.reload);
        let task = tokio::spawn(async move {
            tokio::time::sleep(sleep_for).await;
            if let Err(e) = reload.reload(true).await {
                error!(error = %e, "Reload request was not accepted");
            }
        });

        Ok(RefreshHandle {
            target,
            delay,
            task,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::MockClock;
    use chrono::TimeZone;
    use std::sync::Mutex;

    struct RecordingReload {
        requests: Mutex<Vec<bool>>,
    }

    impl RecordingReload {
        fn new() -> Self {
            Self {
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ReloadStrategy for RecordingReload {
        async fn reload(&self, bypass_cache: bool) -> Result<(), RefreshError> {
            self.requests.lock().unwrap().push(bypass_cache);
            Ok(())
        }
    }

    fn fixed_clock(now: DateTime<Local>) -> MockClock {
        let mut clock = MockClock::new();
        clock.expect_now().return_const(now);
        clock
    }

    #[tokio::test]
    async fn test_arm_reports_target_and_delay() {
        let now = Local.with_ymd_and_hms(2025, 3, 4, 15, 5, 0).unwrap();
        let scheduler = RefreshScheduler::new(
            Arc::new(fixed_clock(now)),
            Arc::new(RecordingReload::new()),
        );

        let handle = scheduler.arm().unwrap();
        assert_eq!(
            handle.target(),
            Local.with_ymd_and_hms(2025, 3, 4, 16, 10, 0).unwrap()
        );
        assert_eq!(handle.delay(), Duration::minutes(65));
    }

    #[tokio::test]
    async fn test_two_arms_compute_independent_triggers() {
        let now = Local.with_ymd_and_hms(2025, 3, 4, 14, 32, 7).unwrap();
        let scheduler = RefreshScheduler::new(
            Arc::new(fixed_clock(now)),
            Arc::new(RecordingReload::new()),
        );

        let first = scheduler.arm().unwrap();
        let second = scheduler.arm().unwrap();
        assert_eq!(first.target(), second.target());
        assert_eq!(first.delay(), second.delay());
    }

    #[tokio::test(start_paused = true)]
    async fn test_firing_requests_cache_bypassing_reload() {
        let now = Local.with_ymd_and_hms(2025, 3, 4, 14, 32, 7).unwrap();
        let reload = Arc::new(RecordingReload::new());
        let reload_dyn: Arc<dyn ReloadStrategy> = reload.clone();
        let scheduler = RefreshScheduler::new(Arc::new(fixed_clock(now)), reload_dyn);

        let handle = scheduler.arm().unwrap();
        handle.fired().await;

        let requests = reload.requests.lock().unwrap();
        assert_eq!(requests.as_slice(), &[true]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reload_not_requested_before_the_timer_fires() {
        let now = Local.with_ymd_and_hms(2025, 3, 4, 14, 32, 7).unwrap();
        let reload = Arc::new(RecordingReload::new());
        let reload_dyn: Arc<dyn ReloadStrategy> = reload.clone();
        let scheduler = RefreshScheduler::new(Arc::new(fixed_clock(now)), reload_dyn);

        let handle = scheduler.arm().unwrap();
        // One second short of the 15:10:00 boundary
        tokio::time::advance(std::time::Duration::from_millis(2_272_000)).await;
        assert!(reload.requests.lock().unwrap().is_empty());

        handle.fired().await;
        assert_eq!(reload.requests.lock().unwrap().as_slice(), &[true]);
    }
}
