//! Property tests for the warmup-aware timer.
//!
//! 1. **Warmup exactness** – the first `w` records leave the accumulators alone.
//! 2. **Merge order** – `add` gives the same totals in any order.
//! 3. **Mean** – `report` divides elapsed time by the count, or yields 0.

use proptest::prelude::*;
use vecadd_harness::{Clock, HarnessError, Result, Timer};

/// Advances by a fixed list of positive steps.
struct SteppingClock {
    now: u64,
    steps: Vec<u64>,
    next: usize,
}

impl SteppingClock {
    fn new(steps: Vec<u64>) -> Self {
        Self { now: 1_000, steps, next: 0 }
    }
}

impl Clock for SteppingClock {
    fn now_ns(&mut self) -> Result<u64> {
        if self.next == 0 {
            self.next = 1;
            return Ok(self.now);
        }
        let step = *self
            .steps
            .get(self.next - 1)
            .ok_or_else(|| HarnessError::Clock("no more steps".into()))?;
        self.next += 1;
        self.now += step;
        Ok(self.now)
    }
}

fn timer_after(steps: Vec<u64>, elements: u64, warmup: u64) -> Timer<SteppingClock> {
    let trials = steps.len();
    let mut timer = Timer::with_clock(warmup, SteppingClock::new(steps));
    timer.begin().unwrap();
    for _ in 0..trials {
        timer.record(elements).unwrap();
    }
    timer
}

fn steps() -> impl Strategy<Value = Vec<u64>> {
    prop::collection::vec(1u64..1_000_000, 0..20)
}

proptest! {
    #[test]
    fn prop_warmup_records_are_discarded(
        warmup in 0u64..10,
        steps in prop::collection::vec(1u64..10_000, 11..30),
        elements in 1u64..1_000_000,
    ) {
        let mut timer = Timer::with_clock(warmup, SteppingClock::new(steps.clone()));
        timer.begin().unwrap();

        for _ in 0..warmup {
            timer.record(elements).unwrap();
            prop_assert_eq!(timer.count(), 0.0);
            prop_assert_eq!(timer.elapsed_ns(), 0.0);
        }

        timer.record(elements).unwrap();
        prop_assert_eq!(timer.count(), elements as f64);
        prop_assert_eq!(timer.elapsed_ns(), steps[warmup as usize] as f64);
    }

    #[test]
    fn prop_merge_is_order_independent(
        a in steps(), b in steps(), c in steps(),
        na in 0u64..10_000, nb in 0u64..10_000, nc in 0u64..10_000,
    ) {
        let (ta, tb, tc) = (timer_after(a, na, 1), timer_after(b, nb, 2), timer_after(c, nc, 0));

        let mut abc = Timer::new(0);
        abc.add(&ta).add(&tb).add(&tc);
        let mut acb = Timer::new(0);
        acb.add(&ta).add(&tc).add(&tb);
        let mut bac = Timer::new(0);
        bac.add(&tb).add(&ta).add(&tc);

        prop_assert_eq!(abc.count(), acb.count());
        prop_assert_eq!(abc.count(), bac.count());
        prop_assert_eq!(abc.elapsed_ns(), acb.elapsed_ns());
        prop_assert_eq!(abc.elapsed_ns(), bac.elapsed_ns());
        prop_assert_eq!(abc.count(), ta.count() + tb.count() + tc.count());
    }

    #[test]
    fn prop_mean_is_elapsed_over_count(steps in steps(), elements in 0u64..10_000) {
        let timer = timer_after(steps, elements, 0);
        let report = timer.report();
        if timer.count() == 0.0 {
            prop_assert_eq!(report.mean_ns, 0.0);
        } else {
            prop_assert_eq!(report.mean_ns, timer.elapsed_ns() / timer.count());
        }
    }
}
