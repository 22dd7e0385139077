use serde::{Deserialize, Serialize};

use super::stress::{burnout_from_hrv, StressState, HRV_MAX, HRV_MIN};

pub const FEED_BPM_MIN: i32 = 40;
pub const FEED_BPM_MAX: i32 = 180;

/// Which update rule owns the stress state. Exactly one is ever active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FeedMode {
    /// Random-walk timers drive heart rate and burnout.
    #[default]
    Autonomous,
    /// Stress is a pure function of the external readings.
    External,
}

/// Operator-supplied synthetic sensor values. Retained across mode switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeedReadings {
    bpm: i32,
    hrv_ms: i32,
}

impl Default for FeedReadings {
    fn default() -> Self {
        Self { bpm: 75, hrv_ms: 55 }
    }
}

impl FeedReadings {
    pub fn new(bpm: i32, hrv_ms: i32) -> Self {
        Self {
            bpm: bpm.clamp(FEED_BPM_MIN, FEED_BPM_MAX),
            hrv_ms: hrv_ms.clamp(HRV_MIN, HRV_MAX),
        }
    }

    pub fn bpm(&self) -> i32 {
        self.bpm
    }

    pub fn hrv_ms(&self) -> i32 {
        self.hrv_ms
    }

    pub fn with_bpm(self, bpm: i32) -> Self {
        Self::new(bpm, self.hrv_ms)
    }

    pub fn with_hrv(self, hrv_ms: i32) -> Self {
        Self::new(self.bpm, hrv_ms)
    }

    /// Heart rate passes straight through; burnout comes from HRV.
    pub fn derive_stress(&self) -> StressState {
        StressState::new(burnout_from_hrv(self.hrv_ms), self.bpm)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SensorFeed {
    pub mode: FeedMode,
    pub readings: FeedReadings,
}

impl SensorFeed {
    pub fn is_external(&self) -> bool {
        self.mode == FeedMode::External
    }

    /// The stress state the feed dictates, if the feed is in control.
    pub fn dictated_stress(&self) -> Option<StressState> {
        match self.mode {
            FeedMode::External => Some(self.readings.derive_stress()),
            FeedMode::Autonomous => None,
        }
    }
}
