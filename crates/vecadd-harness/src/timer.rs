//! Warmup-aware running-average timer
//!
//! A [`Timer`] accumulates elapsed time and an observation count for one
//! named operation across repeated trials. After each [`Timer::begin`] the
//! first `warmup` intervals are discarded so cold caches, branch predictors
//! and frequency ramp-up do not skew the mean. Only two running sums are kept,
//! so memory use does not depend on the number of trials.
//!
//! Both accumulators hold integral values stored as `f64`; merging stays
//! exact (and therefore order-independent) below 2^53.

use crate::error::{HarnessError, Result};
use std::fmt;
use std::sync::OnceLock;
use std::time::Instant;

/// Source of monotonic nanosecond timestamps.
pub trait Clock: Send {
    fn now_ns(&mut self) -> Result<u64>;
}

/// [`Clock`] backed by [`Instant`], immune to wall-clock adjustments.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    #[inline]
    fn now_ns(&mut self) -> Result<u64> {
        static EPOCH: OnceLock<Instant> = OnceLock::new();
        let epoch = *EPOCH.get_or_init(Instant::now);
        u64::try_from(epoch.elapsed().as_nanos())
            .map_err(|_| HarnessError::Clock("elapsed nanoseconds overflow u64".into()))
    }
}

/// Running elapsed-time statistics for one operation
#[derive(Debug, Clone)]
pub struct Timer<C: Clock = MonotonicClock> {
    warmup: u64,
    warmup_remaining: u64,
    checkpoint: Option<u64>,
    count: f64,
    elapsed_ns: f64,
    clock: C,
}

impl Timer {
    pub fn new(warmup: u64) -> Self {
        Self::with_clock(warmup, MonotonicClock)
    }
}

impl<C: Clock> Timer<C> {
    pub fn with_clock(warmup: u64, clock: C) -> Self {
        Self {
            warmup,
            warmup_remaining: 0,
            checkpoint: None,
            count: 0.0,
            elapsed_ns: 0.0,
            clock,
        }
    }

    /// Starts a measurement epoch.
    ///
    /// Rearms the warmup countdown and takes a baseline timestamp. The
    /// accumulated statistics are kept.
    pub fn begin(&mut self) -> Result<()> {
        self.warmup_remaining = self.warmup;
        self.checkpoint = Some(self.clock.now_ns()?);
        Ok(())
    }

    /// Closes the interval since the previous checkpoint.
    ///
    /// While warming up the interval is dropped; afterwards `elements` and the
    /// interval are added to the accumulators together. A zero or negative
    /// interval means the clock cannot be trusted and is fatal.
    pub fn record(&mut self, elements: u64) -> Result<()> {
        let last = self.checkpoint.ok_or(HarnessError::NotStarted)?;
        let now = self.clock.now_ns()?;
        self.checkpoint = Some(now);

        let delta_ns = i128::from(now) - i128::from(last);
        if delta_ns <= 0 {
            return Err(HarnessError::NonPositiveInterval { delta_ns });
        }

        if self.warmup_remaining > 0 {
            self.warmup_remaining -= 1;
            return Ok(());
        }

        self.count += elements as f64;
        self.elapsed_ns += delta_ns as f64;
        Ok(())
    }

    /// Folds another timer's accumulators into this one.
    ///
    /// Warmup settings and the checkpoint are left alone.
    pub fn add<D: Clock>(&mut self, other: &Timer<D>) -> &mut Self {
        self.count += other.count;
        self.elapsed_ns += other.elapsed_ns;
        self
    }

    pub fn report(&self) -> TimerReport {
        TimerReport {
            count: self.count,
            mean_ns: self.elapsed_ns / self.count.max(1.0),
        }
    }

    pub fn count(&self) -> f64 {
        self.count
    }

    pub fn elapsed_ns(&self) -> f64 {
        self.elapsed_ns
    }

    pub fn warmup(&self) -> u64 {
        self.warmup
    }

    pub fn warmup_remaining(&self) -> u64 {
        self.warmup_remaining
    }
}

/// Snapshot of a timer's statistics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimerReport {
    pub count: f64,
    /// Elapsed nanoseconds divided by the observation count.
    pub mean_ns: f64,
}

impl fmt::Display for TimerReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{count={:.0}, am={:.2} ns}}", self.count, self.mean_ns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Replays fixed timestamps.
    struct ScriptedClock(VecDeque<u64>);

    impl ScriptedClock {
        fn new(ticks: &[u64]) -> Self {
            Self(ticks.iter().copied().collect())
        }
    }

    impl Clock for ScriptedClock {
        fn now_ns(&mut self) -> Result<u64> {
            self.0.pop_front().ok_or_else(|| HarnessError::Clock("script exhausted".into()))
        }
    }

    fn timer(warmup: u64, ticks: &[u64]) -> Timer<ScriptedClock> {
        Timer::with_clock(warmup, ScriptedClock::new(ticks))
    }

    #[test]
    fn warmup_prefix_is_discarded() {
        let mut t = timer(2, &[0, 10, 30, 60, 100]);
        t.begin().unwrap();

        t.record(5).unwrap();
        t.record(5).unwrap();
        assert_eq!((t.count(), t.elapsed_ns()), (0.0, 0.0));
        assert_eq!(t.warmup_remaining(), 0);

        t.record(5).unwrap();
        assert_eq!((t.count(), t.elapsed_ns()), (5.0, 30.0));

        t.record(5).unwrap();
        assert_eq!((t.count(), t.elapsed_ns()), (10.0, 70.0));
    }

    #[test]
    fn each_record_measures_since_previous_checkpoint() {
        let mut t = timer(0, &[100, 103, 110]);
        t.begin().unwrap();
        t.record(1).unwrap();
        t.record(1).unwrap();
        assert_eq!(t.elapsed_ns(), 10.0);
    }

    #[test]
    fn begin_rearms_warmup_but_keeps_totals() {
        let mut t = timer(1, &[0, 5, 15, 100, 120, 150]);
        t.begin().unwrap();
        t.record(4).unwrap();
        t.record(4).unwrap();
        assert_eq!((t.count(), t.elapsed_ns()), (4.0, 10.0));

        t.begin().unwrap();
        assert_eq!(t.warmup_remaining(), 1);
        t.record(4).unwrap();
        assert_eq!((t.count(), t.elapsed_ns()), (4.0, 10.0));
        t.record(4).unwrap();
        assert_eq!((t.count(), t.elapsed_ns()), (8.0, 40.0));
    }

    #[test]
    fn zero_interval_is_fatal() {
        let mut t = timer(0, &[50, 50]);
        t.begin().unwrap();
        let err = t.record(1).unwrap_err();
        assert!(matches!(err, HarnessError::NonPositiveInterval { delta_ns: 0 }));
    }

    #[test]
    fn backwards_clock_is_fatal_even_during_warmup() {
        let mut t = timer(3, &[50, 40]);
        t.begin().unwrap();
        let err = t.record(1).unwrap_err();
        assert!(matches!(err, HarnessError::NonPositiveInterval { delta_ns: -10 }));
        assert_eq!(t.count(), 0.0);
    }

    #[test]
    fn record_before_begin_is_fatal() {
        let mut t = timer(0, &[1, 2]);
        assert!(matches!(t.record(1), Err(HarnessError::NotStarted)));
    }

    #[test]
    fn clock_failure_propagates() {
        let mut t = timer(0, &[]);
        assert!(matches!(t.begin(), Err(HarnessError::Clock(_))));
    }

    #[test]
    fn mean_without_observations_is_zero() {
        let t = Timer::new(10);
        assert_eq!(t.report(), TimerReport { count: 0.0, mean_ns: 0.0 });
    }

    #[test]
    fn mean_divides_elapsed_by_count() {
        let mut t = timer(0, &[0, 400]);
        t.begin().unwrap();
        t.record(4).unwrap();
        assert_eq!(t.report().mean_ns, 100.0);
    }

    #[test]
    fn add_merges_accumulators_only() {
        let mut a = timer(3, &[0, 10, 20]);
        a.begin().unwrap();
        let mut b = timer(0, &[0, 10, 30]);
        b.begin().unwrap();
        b.record(2).unwrap();
        b.record(2).unwrap();

        a.add(&b);
        assert_eq!((a.count(), a.elapsed_ns()), (4.0, 30.0));
        assert_eq!(a.warmup(), 3);
        assert_eq!(a.warmup_remaining(), 3);
    }

    #[test]
    fn report_formats_like_summary_line() {
        let report = TimerReport { count: 4096.0, mean_ns: 0.123_456 };
        assert_eq!(report.to_string(), "{count=4096, am=0.12 ns}");
    }

    /// Compiles only because every `Clock` is `Send`.
    fn read_on_thread<C: Clock + 'static>(timer: Timer<C>) -> (f64, f64) {
        std::thread::spawn(move || (timer.count(), timer.elapsed_ns())).join().unwrap()
    }

    #[test]
    fn timers_with_any_clock_move_across_threads() {
        let mut t = timer(0, &[0, 25]);
        t.begin().unwrap();
        t.record(5).unwrap();
        assert_eq!(read_on_thread(t), (5.0, 25.0));
    }

        #[test]
    fn monotonic_clock_advances() {
        let mut clock = MonotonicClock;
        let first = clock.now_ns().unwrap();
        std::thread::sleep(std::time::Duration::from_millis(1));
        assert!(clock.now_ns().unwrap() > first);
    }
}
