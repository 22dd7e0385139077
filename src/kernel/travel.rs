use serde::{Deserialize, Serialize};

/// Meters covered per simulated second.
pub const STEP_METERS: u32 = 5;

/// Seconds an arrival notification stays on screen.
pub const NOTIFICATION_DISPLAY_SECS: u64 = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuietZone {
    pub name: String,
    pub distance_m: u32,
    pub description: String,
}

impl QuietZone {
    fn new(name: &str, distance_m: u32, description: &str) -> Self {
        Self {
            name: name.to_string(),
            distance_m,
            description: description.to_string(),
        }
    }
}

/// Built-in destinations offered on the map panel.
pub fn quiet_zones() -> Vec<QuietZone> {
    vec![
        QuietZone::new("Blue Sensory Pod", 45, "Soft lighting, weighted blankets."),
        QuietZone::new("Reading Nook", 120, "Zero-noise zone, noise cancelling available."),
        QuietZone::new("Outdoor Zen Garden", 280, "Natural breeze, water features."),
    ]
}

pub fn find_zone(name: &str) -> Option<QuietZone> {
    quiet_zones()
        .into_iter()
        .find(|z| z.name.eq_ignore_ascii_case(name.trim()))
}

/// Text shown on arrival when the notification service gives nothing usable.
pub fn fallback_notification(zone: &str) -> String {
    format!("Employee is utilizing {} for regulation.", zone)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TravelProgress {
    EnRoute { remaining_m: u32 },
    Arrived,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelState {
    pub destination: String,
    pub distance_remaining_m: u32,
}

impl TravelState {
    pub fn new(destination: impl Into<String>, distance_m: u32) -> Self {
        Self {
            destination: destination.into(),
            distance_remaining_m: distance_m,
        }
    }

    /// Remaining distance after one more second of walking, floored at zero.
    pub fn advance(&self) -> TravelProgress {
        let remaining_m = self.distance_remaining_m.saturating_sub(STEP_METERS);
        if remaining_m == 0 {
            TravelProgress::Arrived
        } else {
            TravelProgress::EnRoute { remaining_m }
        }
    }
}
