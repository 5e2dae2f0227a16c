use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use log::warn;

use super::WindDatapoint;
use crate::error::{Result, WindError};

/// Finished datapoints waiting for the consumer.
///
/// Unbounded by default: a consumer that never drains makes it grow for as
/// long as the sampling thread runs. With a capacity the oldest datapoint is
/// dropped to make room.
#[derive(Clone)]
pub struct ResultQueue {
    pending: Arc<Mutex<VecDeque<WindDatapoint>>>,
    capacity: Option<usize>,
}

impl ResultQueue {
    pub fn new() -> ResultQueue {
        ResultQueue::with_capacity(None)
    }

    pub fn with_capacity(capacity: Option<usize>) -> ResultQueue {
        ResultQueue {
            pending: Arc::new(Mutex::new(VecDeque::new())),
            capacity,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, VecDeque<WindDatapoint>>> {
        self.pending
            .lock()
            .map_err(|_| WindError::LockPoisoned("pending queue"))
    }

    pub fn append(&self, datapoint: WindDatapoint) -> Result<()> {
        let mut pending = self.lock()?;
        if let Some(capacity) = self.capacity {
            while pending.len() >= capacity.max(1) {
                if let Some(dropped) = pending.pop_front() {
                    warn!("Pending queue full, dropping datapoint from {}", dropped.timestamp);
                }
            }
        }
        pending.push_back(datapoint);
        Ok(())
    }

    pub fn drain_copy(&self) -> Result<Vec<WindDatapoint>> {
        Ok(self.lock()?.iter().copied().collect())
    }

    pub fn clear(&self) -> Result<()> {
        self.lock()?.clear();
        Ok(())
    }

    //append cannot slip in between copying and clearing
    pub fn take(&self) -> Result<Vec<WindDatapoint>> {
        Ok(self.lock()?.drain(..).collect())
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.lock()?.is_empty())
    }
}

impl Default for ResultQueue {
    fn default() -> Self {
        ResultQueue::new()
    }
}
