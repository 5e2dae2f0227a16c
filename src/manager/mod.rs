pub mod anemometer;
pub mod buffer;
pub mod calculator;
pub mod drift;
pub mod manager;
pub mod queue;
pub mod sampler;

use crate::error::{Result, WindError};

/// BCM number of the anemometer switch on the weather station board.
pub const DEFAULT_SPEED_PIN: u8 = 21;

#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default)]
pub struct WindSpeed(f64);
impl WindSpeed {
    pub fn new(meters_per_sec: f64) -> WindSpeed {
        WindSpeed(meters_per_sec)
    }

    pub fn meters_per_sec(&self) -> f64 {
        self.0
    }
    pub fn km_per_hour(&self) -> f64 {
        self.0 * 3.6
    }
}

/// One finished monitoring window, as handed over to the consumer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindDatapoint {
    /// Wall-clock seconds since the Unix epoch at the end of the cycle.
    pub timestamp: i64,
    pub avg_speed: WindSpeed,
    pub gust_speed: WindSpeed,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Calibration {
    pub radius_cm: f64,
    pub factor: f64,
}

impl Calibration {
    pub fn new(radius_cm: f64, factor: f64) -> Result<Calibration> {
        if !(radius_cm.is_finite() && radius_cm > 0.0) {
            return Err(WindError::Config(format!("radius must be positive, got {radius_cm} cm")));
        }
        if !(factor.is_finite() && factor > 0.0) {
            return Err(WindError::Config(format!(
                "calibration factor must be positive, got {factor}"
            )));
        }
        Ok(Calibration { radius_cm, factor })
    }
}

impl Default for Calibration {
    fn default() -> Self {
        Calibration {
            radius_cm: 7.0,
            factor: 0.0218,
        }
    }
}

/// Length of one aggregation cycle and how finely it is cut into windows.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SamplingConfig {
    monitoring_window_s: u32,
    sample_hz: u32,
}

impl SamplingConfig {
    pub fn new(monitoring_window_s: u32, sample_hz: u32) -> Result<SamplingConfig> {
        if !(1..=1000).contains(&sample_hz) {
            return Err(WindError::Config(format!(
                "sample rate must be between 1 and 1000 Hz, got {sample_hz}"
            )));
        }
        if monitoring_window_s == 0 {
            return Err(WindError::Config("monitoring window must be at least 1 s".into()));
        }
        let config = SamplingConfig {
            monitoring_window_s,
            sample_hz,
        };
        //the last window of every cycle is trimmed, so one window alone yields nothing
        if config.window_count() < 2 {
            return Err(WindError::Config(format!(
                "{monitoring_window_s} s at {sample_hz} Hz gives fewer than two windows per cycle"
            )));
        }
        Ok(config)
    }

    pub fn sample_hz(&self) -> u32 {
        self.sample_hz
    }

    pub fn window_ms(&self) -> u64 {
        1000 / self.sample_hz as u64
    }

    pub fn cycle_ms(&self) -> u64 {
        self.monitoring_window_s as u64 * 1000
    }

    pub fn window_count(&self) -> usize {
        self.monitoring_window_s as usize * self.sample_hz as usize
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        SamplingConfig {
            monitoring_window_s: 60,
            sample_hz: 4,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MonitorConfig {
    pub speed_pin: u8,
    pub sampling: SamplingConfig,
    pub calibration: Calibration,
    /// Upper bound of the pending queue; `None` lets it grow without limit.
    pub max_pending: Option<usize>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        MonitorConfig {
            speed_pin: DEFAULT_SPEED_PIN,
            sampling: SamplingConfig::default(),
            calibration: Calibration::default(),
            max_pending: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_sampling_is_240_quarter_second_windows() {
        let config = SamplingConfig::default();
        assert_eq!(config.window_count(), 240);
        assert_eq!(config.window_ms(), 250);
        assert_eq!(config.cycle_ms(), 60_000);
        assert_eq!(SamplingConfig::new(60, 4).unwrap(), config);
    }

    #[test]
    fn rejects_degenerate_sampling() {
        assert!(matches!(SamplingConfig::new(60, 0), Err(WindError::Config(_))));
        assert!(matches!(SamplingConfig::new(0, 4), Err(WindError::Config(_))));
        assert!(matches!(SamplingConfig::new(1, 1), Err(WindError::Config(_))));
        assert!(matches!(SamplingConfig::new(1, 2000), Err(WindError::Config(_))));
        assert!(SamplingConfig::new(1, 2).is_ok());
    }

    #[test]
    fn rejects_non_physical_calibration() {
        assert!(Calibration::new(0.0, 0.0218).is_err());
        assert!(Calibration::new(7.0, f64::NAN).is_err());
        assert!(Calibration::new(7.0, -1.0).is_err());
        assert_eq!(Calibration::new(7.0, 0.0218).unwrap(), Calibration::default());
    }

    #[test]
    fn wind_speed_units() {
        let speed = WindSpeed::new(10.0);
        assert_eq!(speed.meters_per_sec(), 10.0);
        assert!((speed.km_per_hour() - 36.0).abs() < 1e-9);
    }
}
