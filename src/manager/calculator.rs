//! Tick intervals to wind speed.
//!
//! Two switch transitions make up one full turn of the cups, so the rotation
//! frequency is half the transition frequency.

use std::f64::consts::PI;

use super::buffer::Slot;
use super::{Calibration, WindSpeed};

/// Mean interval between consecutive ticks of one window, 0 when the window
/// saw fewer than two ticks.
pub fn average_tick_ms(ticks: &[u64]) -> f64 {
    match (ticks.first(), ticks.last()) {
        (Some(first), Some(last)) if ticks.len() > 1 => {
            last.saturating_sub(*first) as f64 / (ticks.len() - 1) as f64
        }
        _ => 0.0,
    }
}

/// Slots of a cycle snapshot that take part in the calculation: the leading
/// compensated windows and the final window are left out.
pub fn evaluated_windows(snapshot: &[Slot], compensated: usize) -> &[Slot] {
    let end = snapshot.len().saturating_sub(1);
    snapshot.get(compensated..end).unwrap_or(&[])
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CycleSummary {
    pub avg_speed: WindSpeed,
    pub gust_speed: WindSpeed,
}

#[derive(Clone, Copy, Debug)]
pub struct WindCalculator {
    calibration: Calibration,
    sample_hz: u32,
}

impl WindCalculator {
    pub fn new(calibration: Calibration, sample_hz: u32) -> WindCalculator {
        WindCalculator {
            calibration,
            sample_hz,
        }
    }

    pub fn calculate_wind_speed(&self, tick_ms: f64) -> WindSpeed {
        if tick_ms <= 0.0 {
            return WindSpeed::new(0.0);
        }
        let rotation_hz = (1000.0 / tick_ms) / 2.0;
        let circumference_cm = self.calibration.radius_cm * 2.0 * PI;
        WindSpeed::new(rotation_hz * circumference_cm * self.calibration.factor)
    }

    /// Average and gust speed over the evaluated windows of a cycle.
    pub fn summarize<'a, I>(&self, windows: I) -> CycleSummary
    where
        I: IntoIterator<Item = &'a [u64]>,
    {
        let averages: Vec<f64> = windows.into_iter().map(average_tick_ms).collect();
        if averages.is_empty() {
            return CycleSummary {
                avg_speed: WindSpeed::default(),
                gust_speed: WindSpeed::default(),
            };
        }

        //normalised by the number of one-second groups in the cycle
        let seconds = averages.len() as f64 / self.sample_hz as f64;
        let minute_average_tick_ms = averages.iter().sum::<f64>() / seconds;

        let gust_speed = averages
            .iter()
            .filter(|average| **average > 0.0)
            .map(|average| self.calculate_wind_speed(*average))
            .fold(WindSpeed::default(), |gust, speed| if speed > gust { speed } else { gust });

        CycleSummary {
            avg_speed: self.calculate_wind_speed(minute_average_tick_ms),
            gust_speed,
        }
    }

    pub fn evaluate(&self, snapshot: &[Slot], compensated: usize) -> CycleSummary {
        self.summarize(
            evaluated_windows(snapshot, compensated)
                .iter()
                .map(|slot| slot.ticks.as_slice()),
        )
    }
}
