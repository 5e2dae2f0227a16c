//! Pulse sampling: watch the anemometer switch for one window and timestamp
//! every level change.
//!
//! [`PulseSampler`] is the seam between the sampling loop and the way edges
//! are captured. [`BusyWaitSampler`] spins on the pin for the whole window,
//! which gives sub-millisecond edge resolution at the cost of the core; an
//! edge-interrupt based sampler can be dropped in without changing the loop
//! or the calculator.

use std::{hint, time::Instant};

use rppal::gpio::{InputPin, Level};

/// Timestamps (monotonic ms) of pin level changes seen during one window.
pub type TickSample = Vec<u64>;

pub trait SpeedPin: Send {
    fn level(&mut self) -> Level;
}

impl SpeedPin for InputPin {
    fn level(&mut self) -> Level {
        self.read()
    }
}

pub trait Clock: Clone + Send + 'static {
    fn now_ms(&self) -> u64;

    /// Block the calling thread for `ms` without yielding.
    fn spin_for(&self, ms: u64) {
        let start = self.now_ms();
        while self.now_ms().saturating_sub(start) < ms {
            hint::spin_loop();
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> MonotonicClock {
        MonotonicClock {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        MonotonicClock::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

pub trait PulseSampler: Send {
    /// Observe the switch for `window_ms` and return every transition seen.
    fn sample_window(&mut self, window_ms: u64) -> TickSample;
}

pub struct BusyWaitSampler<P: SpeedPin, C: Clock> {
    pin: P,
    clock: C,
}

impl<P: SpeedPin, C: Clock> BusyWaitSampler<P, C> {
    pub fn new(pin: P, clock: C) -> BusyWaitSampler<P, C> {
        BusyWaitSampler { pin, clock }
    }
}

impl<P: SpeedPin, C: Clock> PulseSampler for BusyWaitSampler<P, C> {
    fn sample_window(&mut self, window_ms: u64) -> TickSample {
        let mut previous = self.pin.level();
        let mut ticks = Vec::new();
        let start = self.clock.now_ms();

        //no debounce: every change between two reads is recorded
        while self.clock.now_ms().saturating_sub(start) < window_ms {
            let current = self.pin.level();
            if current != previous {
                ticks.push(self.clock.now_ms());
                previous = current;
            }
        }

        ticks
    }
}
