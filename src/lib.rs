//! Wind speed and gust measurement for a rotating-cup anemometer.
//!
//! A background thread busy-polls the anemometer switch in fixed windows,
//! compensates for the time spent aggregating, and once per monitoring window
//! appends a [`WindDatapoint`] to a shared queue drained by the consumer.

pub mod error;
pub mod manager;

pub use error::{Result, WindError};
pub use manager::anemometer::Anemometer;
pub use manager::manager::Manager;
pub use manager::queue::ResultQueue;
pub use manager::{Calibration, MonitorConfig, SamplingConfig, WindDatapoint, WindSpeed};
