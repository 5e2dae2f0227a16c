//! Fake clock and sampler shared by the integration tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{
    atomic::{AtomicU64, AtomicUsize, Ordering},
    Arc,
};

use wind_monitor::manager::sampler::{Clock, PulseSampler, TickSample};

/// Time only moves when a fake sampler or a compensation wait moves it.
#[derive(Clone, Default)]
pub struct ManualClock(Arc<AtomicU64>);

impl ManualClock {
    pub fn advance(&self, ms: u64) {
        self.0.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }

    fn spin_for(&self, ms: u64) {
        self.advance(ms);
    }
}

/// Replays prepared windows, spending exactly one window of clock time each
/// (plus any extra scheduled for a given call).
pub struct ScriptedSampler {
    clock: ManualClock,
    windows: VecDeque<TickSample>,
    extra_ms: Vec<(usize, u64)>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedSampler {
    pub fn new(clock: ManualClock, windows: Vec<TickSample>) -> ScriptedSampler {
        ScriptedSampler {
            clock,
            windows: windows.into(),
            extra_ms: Vec::new(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Make the `call`-th window (0-based) overrun by `ms`.
    pub fn overrun(mut self, call: usize, ms: u64) -> ScriptedSampler {
        self.extra_ms.push((call, ms));
        self
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

impl PulseSampler for ScriptedSampler {
    fn sample_window(&mut self, window_ms: u64) -> TickSample {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let extra: u64 = self
            .extra_ms
            .iter()
            .filter(|(at, _)| *at == call)
            .map(|(_, ms)| ms)
            .sum();
        self.clock.advance(window_ms + extra);
        self.windows.pop_front().unwrap_or_default()
    }
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
