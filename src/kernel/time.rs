use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Tick {
    pub frame: u64,
}

pub const TICK_MS: u64 = 100;

/// One simulated second. All "time unit" durations are expressed in these.
pub const TICKS_PER_SECOND: u64 = 1000 / TICK_MS;

impl Tick {
    pub fn new() -> Self {
        Tick { frame: 0 }
    }

    pub fn next(&self) -> Self {
        Tick { frame: self.frame + 1 }
    }

    pub fn plus(&self, ticks: u64) -> Self {
        Tick { frame: self.frame + ticks }
    }

    pub fn since(&self, earlier: Tick) -> u64 {
        self.frame.saturating_sub(earlier.frame)
    }
}

/// Converts a wall-clock duration into whole ticks, rounding up so that a
/// non-zero duration never collapses to an immediate deadline.
pub const fn ticks_for_millis(ms: u64) -> u64 {
    (ms + TICK_MS - 1) / TICK_MS
}

pub const fn ticks_for_secs(secs: u64) -> u64 {
    secs * TICKS_PER_SECOND
}
