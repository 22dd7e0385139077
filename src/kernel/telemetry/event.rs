use serde::{Deserialize, Serialize};

use crate::kernel::feed::FeedMode;
use crate::kernel::overload::OverloadState;
use crate::kernel::time::Tick;
use crate::kernel::view::ViewMode;

// Allowed: Timestamps, Durations, Counts, Enums, numeric deltas
// Forbidden: Transcript text, quotes, generated sentences, zone names

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TelemetryEvent {
    OverloadTransition {
        from: OverloadState,
        to: OverloadState,
        tick: Tick,
    },

    ViewTransition {
        from: ViewMode,
        to: ViewMode,
        cause: ViewCause,
    },

    ClassificationCompleted {
        aggressive: bool,
        stress_adjustment: i32,
        /// The service failed and defaults were substituted.
        degraded: bool,
        latency_ticks: u64,
    },

    IncidentLogged,

    Travel(TravelEventKind),

    ListeningToggled {
        enabled: bool,
    },

    RecognitionRestarted,

    FeedModeChanged {
        mode: FeedMode,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewCause {
    User,
    StressEscalation,
    OverloadEscalation,
    Travel,
    Timer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TravelEventKind {
    Started { distance_m: u32 },
    Cancelled { traveled_ticks: u64 },
    Arrived { traveled_ticks: u64 },
    Rejected,
}
