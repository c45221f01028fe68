//! Fixed-capacity sample history.

use crate::{constants::DEFAULT_HISTORY_CAPACITY, types::TrackingSample};
use std::collections::VecDeque;

/// Ring buffer of samples; the oldest entry is dropped once full
#[derive(Debug, Clone)]
pub struct BoundedHistory {
    capacity: usize,
    samples: VecDeque<TrackingSample>,
    dropped: u64,
}

impl BoundedHistory {
    /// Create an empty history
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "History capacity must be greater than 0");
        Self {
            capacity,
            samples: VecDeque::with_capacity(capacity),
            dropped: 0,
        }
    }

    /// Append a sample, evicting the oldest when over capacity
    pub fn push(&mut self, sample: TrackingSample) {
        if self.samples.len() >= self.capacity {
            self.samples.pop_front();
            self.dropped += 1;
        }
        self.samples.push_back(sample);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Samples evicted since creation
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Most recent sample
    #[must_use]
    pub fn latest(&self) -> Option<&TrackingSample> {
        self.samples.back()
    }

    /// Oldest-first iteration
    pub fn iter(&self) -> impl Iterator<Item = &TrackingSample> + Clone {
        self.samples.iter()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

impl Default for BoundedHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl<'a> IntoIterator for &'a BoundedHistory {
    type Item = &'a TrackingSample;
    type IntoIter = std::collections::vec_deque::Iter<'a, TrackingSample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}
