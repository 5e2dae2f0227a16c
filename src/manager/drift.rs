//! Keeps the wall-clock period of a cycle close to the monitoring window.
//!
//! The work done at the end of a cycle (calculation, locking, logging) eats
//! into time that should have been sampled. The overhead measured for one
//! cycle is paid back at the start of the next one by skipping whole windows
//! and shortening the first remaining one.

use super::sampler::Clock;

/// What a compensation poll did with its window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Compensation {
    /// A whole window of overhead was paid back; no time was spent.
    Skipped,
    /// The last fraction of overhead was paid back by waiting out the rest of the window.
    Shortened { waited_ms: u64 },
}

#[derive(Debug)]
pub struct DriftCompensator {
    previous_loop_time: u64,
    last_loop_overhead_ms: i64,
    remaining_loop_overhead_ms: i64,
    processing_overhead_poll_count: usize,
}

impl DriftCompensator {
    pub fn new(now_ms: u64) -> DriftCompensator {
        DriftCompensator {
            previous_loop_time: now_ms,
            last_loop_overhead_ms: 0,
            remaining_loop_overhead_ms: 0,
            processing_overhead_poll_count: 0,
        }
    }

    pub fn restart(&mut self, now_ms: u64) {
        *self = DriftCompensator::new(now_ms);
    }

    pub fn is_compensating(&self) -> bool {
        self.remaining_loop_overhead_ms > 0
    }

    pub fn compensated_windows(&self) -> usize {
        self.processing_overhead_poll_count
    }

    pub fn last_loop_overhead_ms(&self) -> i64 {
        self.last_loop_overhead_ms
    }

    pub fn remaining_loop_overhead_ms(&self) -> i64 {
        self.remaining_loop_overhead_ms
    }

    pub fn compensation_poll<C: Clock>(&mut self, clock: &C, window_ms: u64) -> Compensation {
        let window = window_ms as i64;
        self.processing_overhead_poll_count += 1;

        if self.remaining_loop_overhead_ms >= window {
            self.remaining_loop_overhead_ms -= window;
            return Compensation::Skipped;
        }

        let waited_ms = (window - self.remaining_loop_overhead_ms) as u64;
        clock.spin_for(waited_ms);
        self.remaining_loop_overhead_ms = 0;
        Compensation::Shortened { waited_ms }
    }

    /// Measure the cycle that just ended and schedule its overhead for repayment.
    ///
    /// The budget of a cycle is the nominal duration minus the overhead of the
    /// cycle before, so overhead left uncorrected compounds.
    pub fn end_cycle(&mut self, now_ms: u64, cycle_ms: u64) -> i64 {
        let elapsed = now_ms.saturating_sub(self.previous_loop_time) as i64;
        self.previous_loop_time = now_ms;

        //an early cycle leaves a negative overhead, which lengthens the next budget
        let budget = cycle_ms as i64 - self.last_loop_overhead_ms;
        self.last_loop_overhead_ms = elapsed - budget;
        self.remaining_loop_overhead_ms = self.last_loop_overhead_ms;
        self.processing_overhead_poll_count = 0;

        self.last_loop_overhead_ms
    }
}
