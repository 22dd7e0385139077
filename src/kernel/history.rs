use std::collections::VecDeque;

pub const HISTORY_CAPACITY: usize = 20;

/// Rolling window of burnout samples for the trend line, oldest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StressHistory {
    samples: VecDeque<i32>,
}

impl Default for StressHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl StressHistory {
    pub fn new() -> Self {
        Self {
            samples: VecDeque::with_capacity(HISTORY_CAPACITY),
        }
    }

    /// A window pre-filled with `count` copies of `value` (capped at capacity),
    /// so the graph has a flat line to draw before the first sample lands.
    pub fn seeded(count: usize, value: i32) -> Self {
        let mut history = Self::new();
        for _ in 0..count.min(HISTORY_CAPACITY) {
            history.push(value);
        }
        history
    }

    pub fn push(&mut self, burnout: i32) {
        if self.samples.len() >= HISTORY_CAPACITY {
            self.samples.pop_front();
        }
        self.samples.push_back(burnout);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn latest(&self) -> Option<i32> {
        self.samples.back().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = i32> + '_ {
        self.samples.iter().copied()
    }

    pub fn snapshot(&self) -> Vec<i32> {
        self.samples.iter().copied().collect()
    }
}
