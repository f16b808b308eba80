// src/tracking/position_history.rs

use crate::types::BoundingBox;
use std::collections::VecDeque;

/// Hard ceiling on stored boxes per object, regardless of configuration
pub const MAX_HISTORY_FRAMES: usize = 150;

/// Fixed-capacity FIFO of an object's most recent boxes, oldest first
#[derive(Debug, Clone)]
pub struct PositionHistory {
    boxes: VecDeque<BoundingBox>,
    capacity: usize,
}

impl PositionHistory {
    /// `capacity` is clamped into `[1, MAX_HISTORY_FRAMES]`
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.clamp(1, MAX_HISTORY_FRAMES);
        Self {
            boxes: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn add(&mut self, bbox: BoundingBox) {
        if self.boxes.len() == self.capacity {
            self.boxes.pop_front();
        }
        self.boxes.push_back(bbox);
    }

    /// The `n` most recent boxes, oldest first. Shorter when the history is
    /// shorter; never padded.
    pub fn last_n(&self, n: usize) -> Vec<BoundingBox> {
        let skip = self.boxes.len().saturating_sub(n);
        self.boxes.iter().skip(skip).copied().collect()
    }

    pub fn total_count(&self) -> usize {
        self.boxes.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn latest(&self) -> Option<&BoundingBox> {
        self.boxes.back()
    }

    /// Path length travelled by the box center over the last `n` boxes
    pub fn movement_magnitude(&self, n: usize) -> f32 {
        let window = self.last_n(n);
        window
            .windows(2)
            .map(|pair| pair[0].center().distance_to(pair[1].center()))
            .sum()
    }
}
