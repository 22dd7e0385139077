use rand::Rng;
use serde::{Deserialize, Serialize};

pub const BURNOUT_MIN: i32 = 0;
pub const BURNOUT_MAX: i32 = 100;
pub const BPM_MIN: i32 = 60;
pub const BPM_MAX: i32 = 180;

/// Values restored on arrival at a quiet zone.
pub const BASELINE_BURNOUT: i32 = 15;
pub const BASELINE_BPM: i32 = 70;

pub const INITIAL_BPM: i32 = 72;

/// Burnout above this while the watch face is showing forces the app view.
pub const ESCALATION_BURNOUT: i32 = 85;

const HEART_RATE_NOISE: i32 = 5;
const BURNOUT_STEP: i32 = 15;

// Affine HRV <-> burnout map. HRV ~87ms is fully calm, ~20ms is near the top.
const HRV_INTERCEPT: f64 = 116.0;
const HRV_SLOPE: f64 = 1.33;

pub const HRV_MIN: i32 = 10;
pub const HRV_MAX: i32 = 100;

/// The simulated physiology. Both fields are always inside their ranges;
/// the only way to build one is through the clamping constructors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StressState {
    burnout: i32,
    bpm: i32,
}

impl Default for StressState {
    fn default() -> Self {
        Self::new(BASELINE_BURNOUT, INITIAL_BPM)
    }
}

impl StressState {
    pub fn new(burnout: i32, bpm: i32) -> Self {
        Self {
            burnout: clamp_burnout(burnout),
            bpm: clamp_bpm(bpm),
        }
    }

    pub fn baseline() -> Self {
        Self::new(BASELINE_BURNOUT, BASELINE_BPM)
    }

    pub fn burnout(&self) -> i32 {
        self.burnout
    }

    pub fn bpm(&self) -> i32 {
        self.bpm
    }

    pub fn with_burnout(self, burnout: i32) -> Self {
        Self::new(burnout, self.bpm)
    }

    pub fn with_bpm(self, bpm: i32) -> Self {
        Self::new(self.burnout, bpm)
    }

    /// Applies a signed adjustment to burnout, saturating at the range ends.
    pub fn adjusted(self, delta: i32) -> Self {
        self.with_burnout(self.burnout.saturating_add(delta))
    }

    pub fn tier(&self) -> StressTier {
        StressTier::from_burnout(self.burnout)
    }
}

pub fn clamp_burnout(value: i32) -> i32 {
    value.clamp(BURNOUT_MIN, BURNOUT_MAX)
}

pub fn clamp_bpm(value: i32) -> i32 {
    value.clamp(BPM_MIN, BPM_MAX)
}

/// Autonomous heart-rate update. Heart rate tracks burnout with noise; it is
/// recomputed from burnout each time rather than walking on its own.
pub fn heart_rate_step<R: Rng + ?Sized>(burnout: i32, rng: &mut R) -> i32 {
    let noise = rng.gen_range(-HEART_RATE_NOISE..=HEART_RATE_NOISE);
    let raw = 60.0 + 0.8 * f64::from(burnout) + f64::from(noise);
    clamp_bpm(raw.floor() as i32)
}

/// Autonomous burnout update: symmetric bounded random walk.
pub fn burnout_step<R: Rng + ?Sized>(burnout: i32, rng: &mut R) -> i32 {
    let change = rng.gen_range(-BURNOUT_STEP..=BURNOUT_STEP);
    clamp_burnout(burnout + change)
}

/// Burnout implied by a heart-rate-variability reading (inverse relation).
pub fn burnout_from_hrv(hrv_ms: i32) -> i32 {
    let raw = HRV_INTERCEPT - HRV_SLOPE * f64::from(hrv_ms);
    raw.clamp(f64::from(BURNOUT_MIN), f64::from(BURNOUT_MAX)).floor() as i32
}

/// Synthetic HRV consistent with a burnout value. Inverse of `burnout_from_hrv`
/// up to rounding.
pub fn hrv_from_burnout(burnout: i32) -> i32 {
    let raw = (HRV_INTERCEPT - f64::from(burnout)) / HRV_SLOPE;
    raw.clamp(f64::from(HRV_MIN), f64::from(HRV_MAX)).floor() as i32
}

/// Coarse bands over burnout, used for the mascot on the watch face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StressTier {
    Calm,
    Steady,
    Wise,
    Rest,
    Grounding,
}

impl StressTier {
    pub fn from_burnout(burnout: i32) -> Self {
        match burnout {
            b if b > 80 => StressTier::Grounding,
            b if b > 60 => StressTier::Rest,
            b if b > 40 => StressTier::Wise,
            b if b > 20 => StressTier::Steady,
            _ => StressTier::Calm,
        }
    }

    pub fn mascot(&self) -> &'static str {
        match self {
            StressTier::Calm => "penguin",
            StressTier::Steady => "turtle",
            StressTier::Wise => "owl",
            StressTier::Rest => "koala",
            StressTier::Grounding => "bear",
        }
    }
}
