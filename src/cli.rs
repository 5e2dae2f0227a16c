use clap::{self, Parser};

use wind_monitor::manager::DEFAULT_SPEED_PIN;
use wind_monitor::{Calibration, MonitorConfig, SamplingConfig, WindError};

/// Per-minute wind speed and gust from a cup anemometer.
#[derive(Debug, Parser)]
#[command(long_about = None)]
pub struct Cli {
    /// BCM number of the anemometer switch
    #[arg(long, default_value_t = DEFAULT_SPEED_PIN)]
    pub speed_pin: u8,
    /// Radius of the cup arm in centimetres
    #[arg(long, default_value_t = 7.0)]
    pub radius_cm: f64,
    #[arg(long, default_value_t = 0.0218)]
    pub calibration_factor: f64,
    /// Seconds aggregated into one datapoint
    #[arg(short, long, default_value_t = 60)]
    pub window_secs: u32,
    /// Sampling windows per second
    #[arg(short, long, default_value_t = 4)]
    pub sample_hz: u32,
    /// Keep at most this many unread datapoints, dropping the oldest
    #[arg(long)]
    pub max_pending: Option<usize>,
    #[arg(short, long, default_value_t = 100)]
    pub poll_interval_ms: u64,
    /// Log every window's ticks and every cycle's overhead
    #[arg(short, long)]
    pub debug: bool,
}

impl Cli {
    pub fn monitor_config(&self) -> Result<MonitorConfig, WindError> {
        if self.max_pending == Some(0) {
            return Err(WindError::Config("--max-pending must keep at least one datapoint".into()));
        }
        Ok(MonitorConfig {
            speed_pin: self.speed_pin,
            sampling: SamplingConfig::new(self.window_secs, self.sample_hz)?,
            calibration: Calibration::new(self.radius_cm, self.calibration_factor)?,
            max_pending: self.max_pending,
        })
    }
}
