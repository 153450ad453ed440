//! Tick Scheduler
//!
//! Arms one-shot timers whose delay is drawn fresh for every arm. A loader
//! re-arms from inside each tick, so the sequence of waits is
//! draw, wait, callback, draw, wait, callback... and never a fixed period.

use super::error::{LoaderError, LoaderResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Inclusive bounds of the random delay between ticks, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayRange {
    min_ms: u64,
    max_ms: u64,
}

impl DelayRange {
    pub fn new(min_ms: u64, max_ms: u64) -> LoaderResult<Self> {
        if min_ms > max_ms {
            return Err(LoaderError::InvalidDelayRange {
                min: min_ms,
                max: max_ms,
            });
        }
        Ok(Self { min_ms, max_ms })
    }

    pub fn min(&self) -> Duration {
        Duration::from_millis(self.min_ms)
    }

    pub fn max(&self) -> Duration {
        Duration::from_millis(self.max_ms)
    }

    /// Draw a whole number of milliseconds uniformly from the range
    pub fn sample<G: Rng>(&self, rng: &mut G) -> Duration {
        Duration::from_millis(rng.gen_range(self.min_ms..=self.max_ms))
    }
}

impl Default for DelayRange {
    fn default() -> Self {
        Self {
            min_ms: 200,
            max_ms: 1500,
        }
    }
}

/// Handle to one armed timer
#[derive(Debug)]
pub struct TimerHandle {
    task: JoinHandle<()>,
    delay: Duration,
    settled: Arc<AtomicBool>,
    outstanding: Arc<AtomicUsize>,
}

impl TimerHandle {
    /// Delay this timer was armed with
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Whether the timer fired or was cancelled
    pub fn is_settled(&self) -> bool {
        self.settled.load(Ordering::Acquire)
    }

    /// Prevent the callback from firing if it has not started yet.
    ///
    /// A callback that is already running is not interrupted; callers guard
    /// against that with their own state check.
    pub fn cancel(self) {
        settle(&self.settled, &self.outstanding);
        self.task.abort();
    }
}

fn settle(settled: &AtomicBool, outstanding: &AtomicUsize) {
    if !settled.swap(true, Ordering::AcqRel) {
        outstanding.fetch_sub(1, Ordering::AcqRel);
    }
}

/// One-shot timer factory with jittered delays
pub struct Scheduler {
    range: DelayRange,
    rng: Mutex<StdRng>,
    runtime: Handle,
    outstanding: Arc<AtomicUsize>,
}

impl Scheduler {
    /// Create a scheduler bound to the current tokio runtime
    pub fn new(range: DelayRange, seed: Option<u64>) -> LoaderResult<Self> {
        let runtime = Handle::try_current().map_err(|_| LoaderError::NoRuntime)?;
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            range,
            rng: Mutex::new(rng),
            runtime,
            outstanding: Arc::new(AtomicUsize::new(0)),
        })
    }

    pub fn range(&self) -> DelayRange {
        self.range
    }

    /// Draw the delay for the next arm
    pub fn next_delay(&self) -> Duration {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        self.range.sample(&mut *rng)
    }

    /// Schedule exactly one future invocation of `callback`
    pub fn arm<F>(&self, callback: F) -> TimerHandle
    where
        F: FnOnce() + Send + 'static,
    {
        let delay = self.next_delay();
        let settled = Arc::new(AtomicBool::new(false));
        self.outstanding.fetch_add(1, Ordering::AcqRel);

        let task = {
            let settled = Arc::clone(&settled);
            let outstanding = Arc::clone(&self.outstanding);
            self.runtime.spawn(async move {
                tokio::time::sleep(delay).await;
                settle(&settled, &outstanding);
                callback();
            })
        };

        tracing::trace!(delay_ms = delay.as_millis() as u64, "Timer armed");

        TimerHandle {
            task,
            delay,
            settled,
            outstanding: Arc::clone(&self.outstanding),
        }
    }

    /// Cancel a timer if one is armed; no-op otherwise
    pub fn cancel(&self, handle: Option<TimerHandle>) {
        if let Some(handle) = handle {
            handle.cancel();
        }
    }

    /// Number of armed timers that have neither fired nor been cancelled
    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::atomic::AtomicU32;

    #[test]
    fn test_delay_range_rejects_inverted_bounds() {
        assert_eq!(
            DelayRange::new(1500, 200).unwrap_err(),
            LoaderError::InvalidDelayRange { min: 1500, max: 200 }
        );
    }

    #[test]
    fn test_sampled_delays_stay_in_range_and_vary() {
        let range = DelayRange::new(200, 1500).unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        let draws: Vec<Duration> = (0..1000).map(|_| range.sample(&mut rng)).collect();

        assert!(draws
            .iter()
            .all(|d| *d >= range.min() && *d <= range.max()));
        let distinct: HashSet<_> = draws.iter().collect();
        assert!(distinct.len() > 1, "delays should not be a single constant");
    }

    #[test]
    fn test_equal_bounds_give_fixed_delay() {
        let range = DelayRange::new(300, 300).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(range.sample(&mut rng), Duration::from_millis(300));
    }

    #[test]
    fn test_scheduler_requires_runtime() {
        let result = Scheduler::new(DelayRange::default(), None);
        assert!(matches!(result, Err(LoaderError::NoRuntime)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_arm_fires_once() {
        let scheduler = Scheduler::new(DelayRange::new(100, 100).unwrap(), Some(1)).unwrap();
        let fired = Arc::new(AtomicU32::new(0));

        let handle = {
            let fired = Arc::clone(&fired);
            scheduler.arm(move || {
                fired.fetch_add(1, Ordering::SeqCst);
            })
        };
        assert_eq!(handle.delay(), Duration::from_millis(100));
        assert_eq!(scheduler.outstanding(), 1);

        tokio::time::sleep(Duration::from_millis(500)).await;

        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(handle.is_settled());
        assert_eq!(scheduler.outstanding(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_callback() {
        let scheduler = Scheduler::new(DelayRange::new(100, 200).unwrap(), Some(2)).unwrap();
        let fired = Arc::new(AtomicU32::new(0));

        let handle = {
            let fired = Arc::clone(&fired);
            scheduler.arm(move || {
                fired.fetch_add(1, Ordering::SeqCst);
            })
        };
        scheduler.cancel(Some(handle));
        assert_eq!(scheduler.outstanding(), 0);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        // Nothing armed: still fine
        scheduler.cancel(None);
        assert_eq!(scheduler.outstanding(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_after_fire_is_noop() {
        let scheduler = Scheduler::new(DelayRange::new(50, 50).unwrap(), Some(3)).unwrap();
        let handle = scheduler.arm(|| {});

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(scheduler.outstanding(), 0);

        handle.cancel();
        assert_eq!(scheduler.outstanding(), 0);
    }
}
