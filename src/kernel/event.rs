use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::services::llm::ServiceError;

/// Staleness token carried by every external request and its reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub Uuid);

impl RequestId {
    pub fn new() -> Self {
        RequestId(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub enum Event {
    /// User gestures, operator inputs and environment signals.
    Input(InputEvent),
    /// Replies from external services.
    Service(ServiceEvent),
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Crown press: always "home", also counted toward the triple-press gesture.
    Press,
    OpenApp,
    ShowMap,
    CloseMap,
    ToggleDebug,

    /// Typed edit of the transcript buffer.
    SetTranscript(String),
    SubmitTranscript,

    StartTravel { destination: String, distance_m: u32 },
    CancelTravel,
    DismissNotification,

    SetFeedEnabled(bool),
    SetExternalHeartRate(i32),
    SetExternalHrv(i32),

    /// Speech-to-text capability signals.
    Recognition(RecognitionSignal),

    /// Ask for a one-line status report (emitted as a log effect).
    ReportStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecognitionSignal {
    Started,
    Ended,
    Failed(String),
    Fragment { text: String, is_final: bool },
}

#[derive(Debug, Clone)]
pub enum ServiceEvent {
    AnalysisCompleted {
        request: RequestId,
        outcome: Result<Value, ServiceError>,
    },
    NotificationGenerated {
        request: RequestId,
        outcome: Result<String, ServiceError>,
    },
}

impl InputEvent {
    pub fn travel_to(zone: &crate::kernel::travel::QuietZone) -> Self {
        InputEvent::StartTravel {
            destination: zone.name.clone(),
            distance_m: zone.distance_m,
        }
    }
}
