//! Error type shared by the sampling thread, the shared collections and the binary.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, WindError>;

#[derive(Error, Debug)]
pub enum WindError {
    #[error("GPIO error: {0}")]
    Gpio(#[from] rppal::gpio::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Lock on {0} poisoned by a panicking thread")]
    LockPoisoned(&'static str),

    #[error("Window {index} is outside the sample buffer (length {len})")]
    WindowOutOfRange { index: usize, len: usize },

    #[error("Failed to spawn sampling thread: {0}")]
    Thread(#[source] std::io::Error),

    #[error("Sampling thread already started")]
    AlreadyStarted,
}
