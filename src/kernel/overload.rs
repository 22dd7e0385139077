use serde::{Deserialize, Serialize};

/// Heart rate above this enters overload.
pub const OVERLOAD_ENTER_BPM: i32 = 115;
/// Heart rate at or below this starts the recovery delay.
pub const OVERLOAD_RECOVER_BPM: i32 = 100;
/// Seconds heart rate must stay calm before overload clears.
pub const RECOVERY_DELAY_SECS: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OverloadState {
    #[default]
    Normal,
    Overload,
}

/// What the caller must do with the recovery timer after an observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverloadAction {
    /// NORMAL -> OVERLOAD just happened.
    Entered,
    /// Heart rate is calm; start the recovery delay.
    ArmRecovery,
    /// Heart rate rose again before the delay elapsed; drop the pending recovery.
    CancelRecovery,
}

/// Sensory-overload detector with hysteresis on recovery.
///
/// The monitor does not own a clock. It tells the reactor when to arm or
/// cancel the recovery timer, and the reactor reports back via
/// [`OverloadMonitor::recovery_elapsed`] once the delay has run uninterrupted.
#[derive(Debug, Clone, Default)]
pub struct OverloadMonitor {
    state: OverloadState,
    recovery_armed: bool,
}

impl OverloadMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> OverloadState {
        self.state
    }

    pub fn is_overloaded(&self) -> bool {
        self.state == OverloadState::Overload
    }

    pub fn recovery_armed(&self) -> bool {
        self.recovery_armed
    }

    pub fn observe(&mut self, bpm: i32) -> Option<OverloadAction> {
        match self.state {
            OverloadState::Normal if bpm > OVERLOAD_ENTER_BPM => {
                self.state = OverloadState::Overload;
                self.recovery_armed = false;
                Some(OverloadAction::Entered)
            }
            OverloadState::Normal => None,
            OverloadState::Overload if bpm <= OVERLOAD_RECOVER_BPM => {
                if self.recovery_armed {
                    // Already counting down; a calm reading does not restart it.
                    None
                } else {
                    self.recovery_armed = true;
                    Some(OverloadAction::ArmRecovery)
                }
            }
            OverloadState::Overload => {
                if self.recovery_armed {
                    self.recovery_armed = false;
                    Some(OverloadAction::CancelRecovery)
                } else {
                    None
                }
            }
        }
    }

    /// Called when the recovery timer fires. Returns true if overload cleared.
    pub fn recovery_elapsed(&mut self) -> bool {
        if self.state == OverloadState::Overload && self.recovery_armed {
            self.state = OverloadState::Normal;
            self.recovery_armed = false;
            true
        } else {
            false
        }
    }
}
