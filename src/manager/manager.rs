use rppal::gpio::{Gpio, InputPin};

use super::anemometer::Anemometer;
use super::queue::ResultQueue;
use super::sampler::{BusyWaitSampler, MonotonicClock};
use super::MonitorConfig;
use crate::error::Result;

pub type GpioAnemometer = Anemometer<BusyWaitSampler<InputPin, MonotonicClock>, MonotonicClock>;

pub struct Manager {
    anemometer: GpioAnemometer,
}

impl Manager {
    pub fn new(config: &MonitorConfig) -> Result<Manager> {
        let gpio = Gpio::new()?;
        //the switch pulls the line low while closed
        let speed_pin = gpio.get(config.speed_pin)?.into_input_pullup();

        let clock = MonotonicClock::new();
        let sampler = BusyWaitSampler::new(speed_pin, clock);
        let anemometer = Anemometer::new(
            sampler,
            clock,
            config.sampling,
            config.calibration,
            config.max_pending,
        );

        Ok(Manager { anemometer })
    }

    pub fn prepare(&mut self) -> Result<()> {
        self.anemometer.start_thread()
    }

    pub fn pending(&self) -> ResultQueue {
        self.anemometer.queue()
    }
}
