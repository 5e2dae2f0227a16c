use std::thread::{self, JoinHandle};

use log::{debug, error, info, trace, warn};

use super::buffer::SampleBuffer;
use super::calculator::{evaluated_windows, WindCalculator};
use super::drift::DriftCompensator;
use super::queue::ResultQueue;
use super::sampler::{Clock, PulseSampler};
use super::{Calibration, SamplingConfig, WindDatapoint};
use crate::error::{Result, WindError};

/// How a window of the cycle was spent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WindowMode {
    Sampling,
    Compensating,
}

/// The per-cycle state machine run by the sampling thread.
///
/// Owns the drift state outright; only the buffer and the queue are shared.
pub struct SamplingLoop<S: PulseSampler, C: Clock> {
    sampler: S,
    clock: C,
    config: SamplingConfig,
    calculator: WindCalculator,
    drift: DriftCompensator,
    buffer: SampleBuffer,
    queue: ResultQueue,
    generation: u64,
    stale_windows: usize,
}

impl<S: PulseSampler, C: Clock> SamplingLoop<S, C> {
    pub fn new(
        sampler: S,
        clock: C,
        config: SamplingConfig,
        calibration: Calibration,
        buffer: SampleBuffer,
        queue: ResultQueue,
    ) -> SamplingLoop<S, C> {
        let drift = DriftCompensator::new(clock.now_ms());
        SamplingLoop {
            sampler,
            calculator: WindCalculator::new(calibration, config.sample_hz()),
            clock,
            config,
            drift,
            buffer,
            queue,
            generation: 0,
            stale_windows: 0,
        }
    }

    pub fn drift(&self) -> &DriftCompensator {
        &self.drift
    }

    /// Evaluated windows of the last completed cycle that held data from an
    /// earlier cycle. Always 0 while compensated windows stay leading.
    pub fn stale_windows(&self) -> usize {
        self.stale_windows
    }

    pub fn step_window(&mut self, window_id: usize) -> Result<WindowMode> {
        let window_ms = self.config.window_ms();

        if self.drift.is_compensating() {
            let compensation = self.drift.compensation_poll(&self.clock, window_ms);
            trace!("Window {window_id} compensated: {compensation:?}");
            return Ok(WindowMode::Compensating);
        }

        let ticks = self.sampler.sample_window(window_ms);
        debug!("Window {window_id} has value: {ticks:?}");
        self.buffer.write(window_id, self.generation, ticks)?;
        Ok(WindowMode::Sampling)
    }

    /// Close the cycle: evaluate the buffer, publish the datapoint and
    /// schedule the overhead of this cycle for repayment.
    pub fn complete_cycle(&mut self) -> Result<WindDatapoint> {
        let snapshot = self.buffer.snapshot()?;
        let compensated = self.drift.compensated_windows();

        let stale = evaluated_windows(&snapshot, compensated)
            .iter()
            .filter(|slot| !slot.is_from(self.generation))
            .count();
        self.stale_windows = stale;
        if stale > 0 {
            warn!(
                "{stale} evaluated windows hold data from an earlier cycle ({compensated} compensated)"
            );
        }

        let summary = self.calculator.evaluate(&snapshot, compensated);
        let datapoint = WindDatapoint {
            timestamp: chrono::Utc::now().timestamp(),
            avg_speed: summary.avg_speed,
            gust_speed: summary.gust_speed,
        };
        self.queue.append(datapoint)?;

        let overhead = self.drift.end_cycle(self.clock.now_ms(), self.config.cycle_ms());
        debug!("Processing overhead: {overhead} ms");

        self.generation += 1;
        Ok(datapoint)
    }

    pub fn run_cycle(&mut self) -> Result<WindDatapoint> {
        for window_id in 0..self.config.window_count() {
            self.step_window(window_id)?;
        }
        self.complete_cycle()
    }

    /// Drop a cycle that failed before completing, so its windows and
    /// elapsed time are not charged to the next one.
    pub fn discard_cycle(&mut self) {
        self.drift.restart(self.clock.now_ms());
    }

    pub fn run_forever(mut self) {
        self.drift.restart(self.clock.now_ms());
        loop {
            match self.run_cycle() {
                Ok(datapoint) => info!(
                    "Cycle {} done: avg {:.2} m/s, gust {:.2} m/s",
                    self.generation,
                    datapoint.avg_speed.meters_per_sec(),
                    datapoint.gust_speed.meters_per_sec()
                ),
                Err(err) => {
                    error!("Wind cycle failed: {err}");
                    self.discard_cycle();
                }
            }
        }
    }
}

/// Handle over the sampling thread and the consumer side of its results.
pub struct Anemometer<S: PulseSampler + 'static, C: Clock> {
    sampling: Option<SamplingLoop<S, C>>,
    thread_handler: Option<JoinHandle<()>>,
    queue: ResultQueue,
}

impl<S: PulseSampler + 'static, C: Clock> Anemometer<S, C> {
    pub fn new(
        sampler: S,
        clock: C,
        config: SamplingConfig,
        calibration: Calibration,
        max_pending: Option<usize>,
    ) -> Anemometer<S, C> {
        let buffer = SampleBuffer::new(config.window_count());
        let queue = ResultQueue::with_capacity(max_pending);
        let sampling = SamplingLoop::new(
            sampler,
            clock,
            config,
            calibration,
            buffer,
            queue.clone(),
        );

        Anemometer {
            sampling: Some(sampling),
            thread_handler: None,
            queue,
        }
    }

    pub fn start_thread(&mut self) -> Result<()> {
        let sampling = self.sampling.take().ok_or(WindError::AlreadyStarted)?;

        let thread_handle = thread::Builder::new()
            .name("wind-sampler".into())
            .spawn(move || sampling.run_forever())
            .map_err(WindError::Thread)?;

        self.thread_handler = Some(thread_handle);
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.thread_handler
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    pub fn queue(&self) -> ResultQueue {
        self.queue.clone()
    }

    pub fn check_pending_length(&self) -> Result<usize> {
        self.queue.len()
    }

    pub fn get_pending_data(&self) -> Result<Vec<WindDatapoint>> {
        self.queue.drain_copy()
    }

    pub fn clear_pending_data(&self) -> Result<()> {
        self.queue.clear()
    }

    pub fn take_pending_data(&self) -> Result<Vec<WindDatapoint>> {
        self.queue.take()
    }
}
