use std::sync::{Arc, Mutex};

use super::sampler::TickSample;
use crate::error::{Result, WindError};

/// One window of the current cycle.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Slot {
    /// Cycle that last wrote the slot, `None` until the first write.
    pub generation: Option<u64>,
    pub ticks: TickSample,
}

impl Slot {
    pub fn is_from(&self, generation: u64) -> bool {
        self.generation == Some(generation)
    }
}

/// Fixed-length, lock protected array of per-window tick samples.
///
/// Slots are overwritten in place; a window that was not sampled keeps the
/// data of an earlier cycle.
#[derive(Clone)]
pub struct SampleBuffer {
    slots: Arc<Mutex<Vec<Slot>>>,
}

impl SampleBuffer {
    pub fn new(len: usize) -> SampleBuffer {
        SampleBuffer {
            slots: Arc::new(Mutex::new(vec![Slot::default(); len])),
        }
    }

    pub fn len(&self) -> Result<usize> {
        let slots = self
            .slots
            .lock()
            .map_err(|_| WindError::LockPoisoned("sample buffer"))?;
        Ok(slots.len())
    }

    pub fn write(&self, index: usize, generation: u64, ticks: TickSample) -> Result<()> {
        let mut slots = self
            .slots
            .lock()
            .map_err(|_| WindError::LockPoisoned("sample buffer"))?;
        let len = slots.len();
        let slot = slots
            .get_mut(index)
            .ok_or(WindError::WindowOutOfRange { index, len })?;
        *slot = Slot {
            generation: Some(generation),
            ticks,
        };
        Ok(())
    }

    pub fn snapshot(&self) -> Result<Vec<Slot>> {
        let slots = self
            .slots
            .lock()
            .map_err(|_| WindError::LockPoisoned("sample buffer"))?;
        Ok(slots.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_empty_unwritten_slots() {
        let buffer = SampleBuffer::new(8);
        let snapshot = buffer.snapshot().unwrap();
        assert_eq!(snapshot.len(), 8);
        assert!(snapshot.iter().all(|slot| slot.generation.is_none() && slot.ticks.is_empty()));
    }

    #[test]
    fn write_overwrites_in_place() {
        let buffer = SampleBuffer::new(3);
        buffer.write(1, 0, vec![1, 2, 3]).unwrap();
        buffer.write(1, 1, vec![7]).unwrap();

        let snapshot = buffer.snapshot().unwrap();
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot[1].ticks, vec![7]);
        assert!(snapshot[1].is_from(1));
        assert!(!snapshot[0].is_from(0));
        assert_eq!(buffer.len().unwrap(), 3);
    }

    #[test]
    fn snapshot_is_detached_from_later_writes() {
        let buffer = SampleBuffer::new(2);
        buffer.write(0, 0, vec![10, 20]).unwrap();
        let snapshot = buffer.snapshot().unwrap();
        buffer.write(0, 1, vec![]).unwrap();
        assert_eq!(snapshot[0].ticks, vec![10, 20]);
    }

    #[test]
    fn out_of_range_write_is_an_error() {
        let buffer = SampleBuffer::new(2);
        assert!(matches!(
            buffer.write(2, 0, vec![]),
            Err(WindError::WindowOutOfRange { index: 2, len: 2 })
        ));
    }
}
