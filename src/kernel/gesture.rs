/// Presses needed to toggle witness mode.
pub const GESTURE_TARGET: u8 = 3;
/// Presses further apart than this start a new count.
pub const GESTURE_WINDOW_MS: u64 = 400;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureOutcome {
    /// Target reached; counter is back at zero.
    Toggle,
    /// Still counting. The reset window must be (re)armed.
    Counting(u8),
}

#[derive(Debug, Clone, Default)]
pub struct GestureState {
    press_count: u8,
}

impl GestureState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press_count(&self) -> u8 {
        self.press_count
    }

    pub fn press(&mut self) -> GestureOutcome {
        self.press_count += 1;
        if self.press_count >= GESTURE_TARGET {
            self.press_count = 0;
            GestureOutcome::Toggle
        } else {
            GestureOutcome::Counting(self.press_count)
        }
    }

    /// The window elapsed without another press.
    pub fn expire(&mut self) {
        self.press_count = 0;
    }
}
