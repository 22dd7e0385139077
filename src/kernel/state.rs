use chrono::{DateTime, Local};

use super::classifier::{Classification, Incident, IncidentLog, WitnessStatus};
use super::event::RequestId;
use super::feed::{FeedMode, FeedReadings, SensorFeed};
use super::history::StressHistory;
use super::listening::RecognitionState;
use super::overload::OverloadState;
use super::stress::{hrv_from_burnout, StressState, BASELINE_BURNOUT, ESCALATION_BURNOUT};
use super::time::Tick;
use super::travel::TravelState;
use super::view::ViewMode;

/// Samples the trend line starts with.
const SEEDED_HISTORY: usize = 15;

/// Strict state delta. This is the ONLY way state mutates.
#[derive(Debug, Clone)]
pub enum StateDelta {
    Tick(Tick),
    ClockUpdated(DateTime<Local>),
    HistorySampled,
    /// New stress values from any writer (walk, feed, arrival reset).
    StressUpdated(StressState),
    FeedModeChanged(FeedMode),
    FeedReadingsChanged(FeedReadings),
    OverloadChanged(OverloadState),
    ViewChanged(ViewMode),
    TranscriptChanged(String),
    AnalysisRequested { request: RequestId, text: String },
    AnalysisApplied { text: String, result: Classification, timestamp: String },
    StatusReverted,
    TravelStarted(TravelState),
    TravelAdvanced { remaining_m: u32 },
    TravelCleared,
    NotificationRequested { request: RequestId, zone: String },
    NotificationShown { message: String },
    NotificationDismissed,
    WitnessModeChanged(bool),
    RecognitionChanged(RecognitionState),
}

/// An analysis call that has been sent but not answered. Also the
/// double-submit guard: only one may be outstanding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAnalysis {
    pub request: RequestId,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrivalNotification {
    pub request: RequestId,
    pub zone: String,
    /// None until the generation service (or its fallback) answers.
    pub message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SharedState {
    // Monotonic version, bumped by every reduction
    pub version: u64,
    pub last_tick: Tick,
    pub clock: DateTime<Local>,

    stress: StressState,
    history: StressHistory,
    feed: SensorFeed,
    overload: OverloadState,

    view: ViewMode,
    status: WitnessStatus,

    transcript: String,
    pending_analysis: Option<PendingAnalysis>,
    incidents: IncidentLog,

    travel: Option<TravelState>,
    notification: Option<ArrivalNotification>,

    witness_mode: bool,
    recognition: RecognitionState,
}

impl Default for SharedState {
    fn default() -> Self {
        Self {
            version: 0,
            last_tick: Tick::new(),
            clock: Local::now(),
            stress: StressState::default(),
            history: StressHistory::seeded(SEEDED_HISTORY, BASELINE_BURNOUT),
            feed: SensorFeed::default(),
            overload: OverloadState::Normal,
            view: ViewMode::Face,
            status: WitnessStatus::Monitoring,
            transcript: String::new(),
            pending_analysis: None,
            incidents: IncidentLog::new(),
            travel: None,
            notification: None,
            witness_mode: false,
            recognition: RecognitionState::Stopped,
        }
    }
}

impl SharedState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pure reduction: State + Delta -> Mutated State
    pub fn reduce(&mut self, delta: StateDelta) {
        self.version += 1;

        match delta {
            StateDelta::Tick(t) => {
                self.last_tick = t;
            }
            StateDelta::ClockUpdated(now) => {
                self.clock = now;
            }
            StateDelta::HistorySampled => {
                self.history.push(self.stress.burnout());
            }
            StateDelta::StressUpdated(stress) => {
                self.set_stress(stress);
            }
            StateDelta::FeedModeChanged(mode) => {
                self.feed.mode = mode;
            }
            StateDelta::FeedReadingsChanged(readings) => {
                self.feed.readings = readings;
            }
            StateDelta::OverloadChanged(state) => {
                self.overload = state;
                if state == OverloadState::Overload {
                    self.view = self.view.escalate();
                }
            }
            StateDelta::ViewChanged(view) => {
                self.view = view;
            }
            StateDelta::TranscriptChanged(text) => {
                self.transcript = text;
            }
            StateDelta::AnalysisRequested { request, text } => {
                self.pending_analysis = Some(PendingAnalysis { request, text });
            }
            StateDelta::AnalysisApplied { text, result, timestamp } => {
                let adjusted = self.stress.adjusted(result.stress_adjustment);

                // The feed stays the source of truth: the adjustment moves its
                // HRV reading and stress is re-derived from that.
                let stress = match self.feed.mode {
                    FeedMode::External => {
                        self.feed.readings = self
                            .feed
                            .readings
                            .with_hrv(hrv_from_burnout(adjusted.burnout()));
                        self.feed.readings.derive_stress()
                    }
                    FeedMode::Autonomous => adjusted,
                };
                self.set_stress(stress);

                if result.is_aggressive {
                    self.incidents.record(Incident {
                        timestamp,
                        quote: text.clone(),
                        reason: result.reason,
                    });
                    self.status = WitnessStatus::ThreatDetected;
                } else {
                    self.status = WitnessStatus::Monitoring;
                }

                // Edits made while the call was in flight survive.
                if self.transcript == text {
                    self.transcript.clear();
                }
                self.pending_analysis = None;
            }
            StateDelta::StatusReverted => {
                self.status = WitnessStatus::Monitoring;
            }
            StateDelta::TravelStarted(travel) => {
                self.travel = Some(travel);
                self.view = self.view.begin_travel();
            }
            StateDelta::TravelAdvanced { remaining_m } => {
                if let Some(travel) = self.travel.as_mut() {
                    travel.distance_remaining_m = remaining_m;
                }
            }
            StateDelta::TravelCleared => {
                self.travel = None;
            }
            StateDelta::NotificationRequested { request, zone } => {
                self.notification = Some(ArrivalNotification {
                    request,
                    zone,
                    message: None,
                });
            }
            StateDelta::NotificationShown { message } => {
                if let Some(n) = self.notification.as_mut() {
                    n.message = Some(message);
                }
            }
            StateDelta::NotificationDismissed => {
                self.notification = None;
                self.view = self.view.dismiss_notification();
            }
            StateDelta::WitnessModeChanged(enabled) => {
                self.witness_mode = enabled;
            }
            StateDelta::RecognitionChanged(state) => {
                self.recognition = state;
            }
        }
    }

    fn set_stress(&mut self, stress: StressState) {
        self.stress = stress;
        if stress.burnout() > ESCALATION_BURNOUT {
            self.view = self.view.escalate();
        }
    }

    /// One-line human readable status, for the console.
    pub fn summary(&self) -> String {
        let mut line = format!(
            "{} | burnout {} ({}) | {} bpm | {:?} | {:?} | {}",
            self.clock.format("%H:%M:%S"),
            self.stress.burnout(),
            self.stress.tier().mascot(),
            self.stress.bpm(),
            self.overload,
            self.view,
            self.status.label(),
        );
        if self.feed.is_external() {
            line.push_str(&format!(
                " | feed {} bpm / {} ms",
                self.feed.readings.bpm(),
                self.feed.readings.hrv_ms()
            ));
        }
        if let Some(travel) = &self.travel {
            line.push_str(&format!(" | -> {} {}m", travel.destination, travel.distance_remaining_m));
        }
        if let Some(message) = self.notification.as_ref().and_then(|n| n.message.as_ref()) {
            line.push_str(&format!(" | \"{}\"", message));
        }
        if self.witness_mode {
            line.push_str(&format!(" | witness {:?}", self.recognition));
        }
        if !self.incidents.is_empty() {
            line.push_str(&format!(" | {} incidents", self.incidents.len()));
        }
        line
    }

    // Read-only accessors
    pub fn stress(&self) -> StressState {
        self.stress
    }

    pub fn burnout(&self) -> i32 {
        self.stress.burnout()
    }

    pub fn bpm(&self) -> i32 {
        self.stress.bpm()
    }

    pub fn history(&self) -> &StressHistory {
        &self.history
    }

    pub fn feed(&self) -> &SensorFeed {
        &self.feed
    }

    pub fn overload(&self) -> OverloadState {
        self.overload
    }

    pub fn view(&self) -> ViewMode {
        self.view
    }

    pub fn status(&self) -> WitnessStatus {
        self.status
    }

    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    pub fn pending_analysis(&self) -> Option<&PendingAnalysis> {
        self.pending_analysis.as_ref()
    }

    pub fn is_analyzing(&self) -> bool {
        self.pending_analysis.is_some()
    }

    pub fn incidents(&self) -> &IncidentLog {
        &self.incidents
    }

    pub fn travel(&self) -> Option<&TravelState> {
        self.travel.as_ref()
    }

    pub fn notification(&self) -> Option<&ArrivalNotification> {
        self.notification.as_ref()
    }

    pub fn witness_mode(&self) -> bool {
        self.witness_mode
    }

    pub fn recognition(&self) -> RecognitionState {
        self.recognition
    }
}
