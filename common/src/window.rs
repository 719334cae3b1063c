use std::collections::VecDeque;

use crate::sensor::LightSample;

/// Fixed-capacity FIFO of light samples, oldest first.
#[derive(Clone, Debug, PartialEq)]
pub struct LightWindow {
    samples: VecDeque<LightSample>,
    capacity: usize,
}

impl LightWindow {
    pub const DEFAULT_CAPACITY: usize = 10;

    /// Creates an empty window. A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends `sample`, evicting and returning the oldest one when the window is full.
    pub fn push(&mut self, sample: LightSample) -> Option<LightSample> {
        let evicted = if self.samples.len() == self.capacity {
            self.samples.pop_front()
        } else {
            None
        };
        self.samples.push_back(sample);
        evicted
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn latest(&self) -> Option<&LightSample> {
        self.samples.back()
    }

    pub fn values(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.value).collect()
    }

    pub fn timestamps(&self) -> Vec<i64> {
        self.samples.iter().map(|s| s.timestamp).collect()
    }

    pub fn to_vec(&self) -> Vec<LightSample> {
        self.samples.iter().copied().collect()
    }
}

impl Default for LightWindow {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}
