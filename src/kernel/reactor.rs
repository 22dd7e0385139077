use chrono::Local;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::mpsc;
use tokio::time::{interval, Duration}; // Only for the loop driver
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::classifier::{Classification, THREAT_DISPLAY_SECS};
use super::event::{Event, InputEvent, RecognitionSignal, RequestId, ServiceEvent};
use super::feed::FeedMode;
use super::gesture::{GestureOutcome, GestureState, GESTURE_WINDOW_MS};
use super::listening::{ListenCommand, ListenRequest, RecognitionGraph};
use super::overload::{OverloadAction, OverloadMonitor, OverloadState, RECOVERY_DELAY_SECS};
use super::scheduler::{Scheduler, SideEffect, TimerId};
use super::state::{SharedState, StateDelta};
use super::stress::{burnout_step, heart_rate_step, StressState};
use super::telemetry::event::{TelemetryEvent, TravelEventKind, ViewCause};
use super::telemetry::recorder::TelemetryRecorder;
use super::time::{ticks_for_millis, ticks_for_secs, Tick, TICK_MS};
use super::travel::{fallback_notification, TravelProgress, TravelState, NOTIFICATION_DISPLAY_SECS};
use super::view::ViewMode;
use crate::driver::EffectExecutor;
use crate::services::llm::AssistantService;

const CLOCK_SECS: u64 = 1;
const HISTORY_SAMPLE_SECS: u64 = 3;
const HEART_RATE_WALK_SECS: u64 = 4;
const BURNOUT_WALK_SECS: u64 = 6;
const TRAVEL_STEP_SECS: u64 = 1;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReactorConfig {
    /// Fixed seed for the random walks. None draws from the OS.
    pub rng_seed: Option<u64>,
}

pub struct Reactor {
    pub receiver: mpsc::Receiver<Event>,
    // Handed to the effect executor so service replies come back here
    tx_clone: mpsc::Sender<Event>,
    pub state: SharedState,
    pub scheduler: Scheduler,
    pub overload: OverloadMonitor,
    pub gesture: GestureState,
    pub telemetry: TelemetryRecorder,
    pub tick: Tick,
    rng: StdRng,
    analysis_sent_at: Option<Tick>,
    travel_started_at: Option<Tick>,
}

impl Reactor {
    pub fn new(receiver: mpsc::Receiver<Event>, tx: mpsc::Sender<Event>, config: ReactorConfig) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut reactor = Self {
            receiver,
            tx_clone: tx,
            state: SharedState::new(),
            scheduler: Scheduler::new(),
            overload: OverloadMonitor::new(),
            gesture: GestureState::new(),
            telemetry: TelemetryRecorder::new(),
            tick: Tick::new(),
            rng,
            analysis_sent_at: None,
            travel_started_at: None,
        };

        let now = reactor.tick;
        reactor.scheduler.every(TimerId::Clock, ticks_for_secs(CLOCK_SECS), now);
        reactor.scheduler.every(TimerId::HistorySample, ticks_for_secs(HISTORY_SAMPLE_SECS), now);
        reactor.arm_random_walks();
        reactor
    }

    pub fn sender(&self) -> mpsc::Sender<Event> {
        self.tx_clone.clone()
    }

    /// Pure Tick Step: Advances State. Returns SideEffects to be executed by the driver.
    /// MUST NOT await I/O or timers.
    ///
    /// The tick advances first, then queued events apply in arrival order,
    /// then every due timer fires.
    pub fn tick_step(&mut self, events: Vec<Event>) -> Vec<SideEffect> {
        self.tick = self.tick.next();
        self.state.reduce(StateDelta::Tick(self.tick));
        let mut effects = Vec::new();

        for event in events {
            match event {
                Event::Input(input) => self.handle_input(input, &mut effects),
                Event::Service(reply) => self.handle_service(reply, &mut effects),
            }
        }

        while let Some(timer) = self.scheduler.pop_due(self.tick) {
            self.handle_timer(timer, &mut effects);
        }

        effects
    }

    /// Releases every timer. The reactor is inert afterwards.
    pub fn shutdown(&mut self) {
        let released = self.scheduler.armed_count();
        self.scheduler.clear();
        info!("Reactor shut down, released {} timers", released);
    }

    // === Inputs ===

    fn handle_input(&mut self, input: InputEvent, effects: &mut Vec<SideEffect>) {
        match input {
            InputEvent::Press => self.press(effects),
            InputEvent::OpenApp => {
                let view = self.state.view().open_app();
                self.apply(StateDelta::ViewChanged(view), ViewCause::User);
            }
            InputEvent::ShowMap => {
                let view = self.state.view().show_map();
                self.apply(StateDelta::ViewChanged(view), ViewCause::User);
            }
            InputEvent::CloseMap => {
                let view = self.state.view().close_map();
                self.apply(StateDelta::ViewChanged(view), ViewCause::User);
            }
            InputEvent::ToggleDebug => {
                let view = self.state.view().toggle_debug();
                self.apply(StateDelta::ViewChanged(view), ViewCause::User);
            }
            InputEvent::SetTranscript(text) => {
                self.state.reduce(StateDelta::TranscriptChanged(text));
            }
            InputEvent::SubmitTranscript => self.submit_transcript(effects),
            InputEvent::StartTravel { destination, distance_m } => {
                self.start_travel(destination, distance_m, effects)
            }
            InputEvent::CancelTravel => self.cancel_travel(),
            InputEvent::DismissNotification => {
                if self.state.notification().is_some() {
                    self.scheduler.cancel(TimerId::NotificationDismiss);
                    self.apply(StateDelta::NotificationDismissed, ViewCause::User);
                }
            }
            InputEvent::SetFeedEnabled(enabled) => self.set_feed_enabled(enabled),
            InputEvent::SetExternalHeartRate(bpm) => {
                let readings = self.state.feed().readings.with_bpm(bpm);
                self.state.reduce(StateDelta::FeedReadingsChanged(readings));
                self.sync_feed();
            }
            InputEvent::SetExternalHrv(hrv) => {
                let readings = self.state.feed().readings.with_hrv(hrv);
                self.state.reduce(StateDelta::FeedReadingsChanged(readings));
                self.sync_feed();
            }
            InputEvent::Recognition(signal) => self.handle_recognition(signal, effects),
            InputEvent::ReportStatus => effects.push(SideEffect::Log(self.state.summary())),
        }
    }

    fn press(&mut self, effects: &mut Vec<SideEffect>) {
        // Always acts as "home"
        self.apply(StateDelta::ViewChanged(ViewMode::Face), ViewCause::User);

        match self.gesture.press() {
            GestureOutcome::Toggle => {
                self.scheduler.cancel(TimerId::GestureReset);
                self.toggle_witness_mode(effects);
            }
            GestureOutcome::Counting(_) => {
                self.scheduler
                    .after(TimerId::GestureReset, ticks_for_millis(GESTURE_WINDOW_MS), self.tick);
            }
        }
    }

    fn toggle_witness_mode(&mut self, effects: &mut Vec<SideEffect>) {
        let enabled = !self.state.witness_mode();
        self.state.reduce(StateDelta::WitnessModeChanged(enabled));
        self.telemetry.record(TelemetryEvent::ListeningToggled { enabled });
        info!("Witness mode {}", if enabled { "enabled" } else { "disabled" });

        let request = if enabled { ListenRequest::Enable } else { ListenRequest::Disable };
        self.listen(request, effects);
    }

    fn handle_recognition(&mut self, signal: RecognitionSignal, effects: &mut Vec<SideEffect>) {
        match signal {
            RecognitionSignal::Started => self.listen(ListenRequest::Started, effects),
            RecognitionSignal::Ended => self.listen(ListenRequest::Ended, effects),
            RecognitionSignal::Failed(reason) => {
                debug!("Speech recognition error: {}", reason);
                self.listen(ListenRequest::Failed, effects);
            }
            RecognitionSignal::Fragment { text, is_final } => {
                // Live text only counts while witness mode owns the buffer.
                if self.state.witness_mode() && !text.trim().is_empty() {
                    debug!("Transcript fragment (final: {})", is_final);
                    self.state.reduce(StateDelta::TranscriptChanged(text));
                }
            }
        }
    }

    fn listen(&mut self, request: ListenRequest, effects: &mut Vec<SideEffect>) {
        let current = self.state.recognition();
        let Some(transition) =
            RecognitionGraph::transition(current, self.state.witness_mode(), request)
        else {
            return;
        };

        if transition.next != current {
            self.state.reduce(StateDelta::RecognitionChanged(transition.next));
        }
        if transition.restarted {
            warn!("Speech recognition stopped unexpectedly, restarting");
            self.telemetry.record(TelemetryEvent::RecognitionRestarted);
        }
        match transition.command {
            Some(ListenCommand::Start) => effects.push(SideEffect::StartRecognition),
            Some(ListenCommand::Stop) => effects.push(SideEffect::StopRecognition),
            None => {}
        }
    }

    // === Classification gateway ===

    fn submit_transcript(&mut self, effects: &mut Vec<SideEffect>) {
        let text = self.state.transcript().to_string();
        if text.trim().is_empty() {
            debug!("Ignoring empty transcript submit");
            return;
        }
        if let Some(pending) = self.state.pending_analysis() {
            debug!("Analysis {} already in flight, ignoring submit", pending.request);
            return;
        }

        let request = RequestId::new();
        self.state.reduce(StateDelta::AnalysisRequested {
            request,
            text: text.clone(),
        });
        self.analysis_sent_at = Some(self.tick);
        effects.push(SideEffect::ClassifyTranscript { request, text });
    }

    fn handle_service(&mut self, reply: ServiceEvent, effects: &mut Vec<SideEffect>) {
        match reply {
            ServiceEvent::AnalysisCompleted { request, outcome } => {
                let pending = match self.state.pending_analysis() {
                    Some(p) if p.request == request => p.clone(),
                    _ => {
                        info!("Discarded stale analysis reply {}", request);
                        return;
                    }
                };

                let degraded = outcome.is_err();
                let result = Classification::from_service(outcome);
                let timestamp = self.state.clock.format("%H:%M:%S").to_string();
                let latency_ticks = self
                    .analysis_sent_at
                    .take()
                    .map(|sent| self.tick.since(sent))
                    .unwrap_or(0);

                self.telemetry.record(TelemetryEvent::ClassificationCompleted {
                    aggressive: result.is_aggressive,
                    stress_adjustment: result.stress_adjustment,
                    degraded,
                    latency_ticks,
                });

                if result.is_aggressive {
                    warn!("Threat detected: {}", result.reason);
                    self.telemetry.record(TelemetryEvent::IncidentLogged);
                    self.scheduler
                        .after(TimerId::StatusRevert, ticks_for_secs(THREAT_DISPLAY_SECS), self.tick);
                } else {
                    self.scheduler.cancel(TimerId::StatusRevert);
                }

                info!(
                    "Analysis applied: adjustment {:+}, severity {:.2}",
                    result.stress_adjustment, result.severity
                );
                self.apply(
                    StateDelta::AnalysisApplied {
                        text: pending.text,
                        result,
                        timestamp,
                    },
                    ViewCause::StressEscalation,
                );
            }
            ServiceEvent::NotificationGenerated { request, outcome } => {
                let zone = match self.state.notification() {
                    Some(n) if n.request == request && n.message.is_none() => n.zone.clone(),
                    _ => {
                        debug!("Dropped notification reply {}: no longer pending", request);
                        return;
                    }
                };

                let message = match outcome {
                    Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
                    Ok(_) => fallback_notification(&zone),
                    Err(e) => {
                        warn!("Notification generation failed: {}", e);
                        fallback_notification(&zone)
                    }
                };

                info!("Manager notified: {}", zone);
                effects.push(SideEffect::Log(format!("Notification sent for {}", zone)));
                self.state.reduce(StateDelta::NotificationShown { message });
                self.scheduler.after(
                    TimerId::NotificationDismiss,
                    ticks_for_secs(NOTIFICATION_DISPLAY_SECS),
                    self.tick,
                );
            }
        }
    }

    // === Travel ===

    fn start_travel(&mut self, destination: String, distance_m: u32, effects: &mut Vec<SideEffect>) {
        if let Some(current) = self.state.travel() {
            warn!(
                "Travel to {} already in progress, rejecting {}",
                current.destination, destination
            );
            self.telemetry.record(TelemetryEvent::Travel(TravelEventKind::Rejected));
            return;
        }
        let destination = destination.trim().to_string();
        if destination.is_empty() {
            warn!("Travel request without a destination");
            self.telemetry.record(TelemetryEvent::Travel(TravelEventKind::Rejected));
            return;
        }

        info!("Navigating to {} ({}m)", destination, distance_m);
        self.apply(
            StateDelta::TravelStarted(TravelState::new(destination.clone(), distance_m)),
            ViewCause::Travel,
        );
        self.telemetry
            .record(TelemetryEvent::Travel(TravelEventKind::Started { distance_m }));
        self.travel_started_at = Some(self.tick);

        if distance_m == 0 {
            self.arrive(destination, effects);
        } else {
            self.scheduler
                .every(TimerId::TravelCountdown, ticks_for_secs(TRAVEL_STEP_SECS), self.tick);
        }
    }

    fn cancel_travel(&mut self) {
        let Some(travel) = self.state.travel() else {
            debug!("Cancel requested with no travel in progress");
            return;
        };
        info!("Route to {} cancelled", travel.destination);

        self.scheduler.cancel(TimerId::TravelCountdown);
        self.state.reduce(StateDelta::TravelCleared);
        let view = self.state.view().leave_travel();
        self.apply(StateDelta::ViewChanged(view), ViewCause::User);

        let traveled_ticks = self.travel_elapsed();
        self.telemetry
            .record(TelemetryEvent::Travel(TravelEventKind::Cancelled { traveled_ticks }));
    }

    fn advance_travel(&mut self, effects: &mut Vec<SideEffect>) {
        let Some(travel) = self.state.travel().cloned() else {
            self.scheduler.cancel(TimerId::TravelCountdown);
            return;
        };

        match travel.advance() {
            TravelProgress::EnRoute { remaining_m } => {
                self.state.reduce(StateDelta::TravelAdvanced { remaining_m });
            }
            TravelProgress::Arrived => {
                self.state.reduce(StateDelta::TravelAdvanced { remaining_m: 0 });
                self.arrive(travel.destination, effects);
            }
        }
    }

    fn arrive(&mut self, zone: String, effects: &mut Vec<SideEffect>) {
        info!("Arrived at {}", zone);
        self.scheduler.cancel(TimerId::TravelCountdown);
        self.state.reduce(StateDelta::TravelCleared);

        self.commit_stress(StressState::baseline());

        // A newer arrival supersedes any notification still on screen.
        self.scheduler.cancel(TimerId::NotificationDismiss);
        let request = RequestId::new();
        self.state.reduce(StateDelta::NotificationRequested {
            request,
            zone: zone.clone(),
        });
        let view = self.state.view().arrive();
        self.apply(StateDelta::ViewChanged(view), ViewCause::Travel);

        let traveled_ticks = self.travel_elapsed();
        self.telemetry
            .record(TelemetryEvent::Travel(TravelEventKind::Arrived { traveled_ticks }));
        effects.push(SideEffect::GenerateNotification { request, zone });
    }

    fn travel_elapsed(&mut self) -> u64 {
        self.travel_started_at
            .take()
            .map(|start| self.tick.since(start))
            .unwrap_or(0)
    }

    // === Stress simulation ===

    fn set_feed_enabled(&mut self, enabled: bool) {
        let mode = if enabled { FeedMode::External } else { FeedMode::Autonomous };
        if self.state.feed().mode == mode {
            return;
        }

        info!("Sensor feed mode: {:?}", mode);
        self.state.reduce(StateDelta::FeedModeChanged(mode));
        self.telemetry.record(TelemetryEvent::FeedModeChanged { mode });

        match mode {
            FeedMode::External => {
                self.scheduler.cancel(TimerId::HeartRateWalk);
                self.scheduler.cancel(TimerId::BurnoutWalk);
                self.sync_feed();
            }
            FeedMode::Autonomous => self.arm_random_walks(),
        }
    }

    fn arm_random_walks(&mut self) {
        self.scheduler
            .every(TimerId::HeartRateWalk, ticks_for_secs(HEART_RATE_WALK_SECS), self.tick);
        self.scheduler
            .every(TimerId::BurnoutWalk, ticks_for_secs(BURNOUT_WALK_SECS), self.tick);
    }

    /// Recomputes stress from the external readings, if the feed is in control.
    fn sync_feed(&mut self) {
        if let Some(stress) = self.state.feed().dictated_stress() {
            self.commit_stress(stress);
        }
    }

    fn commit_stress(&mut self, stress: StressState) {
        self.apply(StateDelta::StressUpdated(stress), ViewCause::StressEscalation);
        self.observe_heart_rate();
    }

    fn observe_heart_rate(&mut self) {
        match self.overload.observe(self.state.bpm()) {
            Some(OverloadAction::Entered) => {
                warn!("Sensory overload: {} bpm", self.state.bpm());
                self.scheduler.cancel(TimerId::OverloadRecovery);
                self.telemetry.record(TelemetryEvent::OverloadTransition {
                    from: OverloadState::Normal,
                    to: OverloadState::Overload,
                    tick: self.tick,
                });
                self.apply(
                    StateDelta::OverloadChanged(OverloadState::Overload),
                    ViewCause::OverloadEscalation,
                );
            }
            Some(OverloadAction::ArmRecovery) => {
                self.scheduler.after(
                    TimerId::OverloadRecovery,
                    ticks_for_secs(RECOVERY_DELAY_SECS),
                    self.tick,
                );
            }
            Some(OverloadAction::CancelRecovery) => {
                self.scheduler.cancel(TimerId::OverloadRecovery);
            }
            None => {}
        }
    }

    // === Timers ===

    fn handle_timer(&mut self, timer: TimerId, effects: &mut Vec<SideEffect>) {
        match timer {
            TimerId::Clock => {
                self.state.reduce(StateDelta::ClockUpdated(Local::now()));
            }
            TimerId::HistorySample => {
                self.state.reduce(StateDelta::HistorySampled);
            }
            TimerId::HeartRateWalk => {
                if self.state.feed().is_external() {
                    return;
                }
                let stress = self.state.stress();
                let bpm = heart_rate_step(stress.burnout(), &mut self.rng);
                self.commit_stress(stress.with_bpm(bpm));
            }
            TimerId::BurnoutWalk => {
                if self.state.feed().is_external() {
                    return;
                }
                let stress = self.state.stress();
                let burnout = burnout_step(stress.burnout(), &mut self.rng);
                self.commit_stress(stress.with_burnout(burnout));
            }
            TimerId::OverloadRecovery => {
                if self.overload.recovery_elapsed() {
                    info!("Sensory overload cleared");
                    self.telemetry.record(TelemetryEvent::OverloadTransition {
                        from: OverloadState::Overload,
                        to: OverloadState::Normal,
                        tick: self.tick,
                    });
                    self.state.reduce(StateDelta::OverloadChanged(OverloadState::Normal));
                }
            }
            TimerId::TravelCountdown => self.advance_travel(effects),
            TimerId::StatusRevert => {
                self.state.reduce(StateDelta::StatusReverted);
            }
            TimerId::NotificationDismiss => {
                if self.state.notification().is_some() {
                    self.apply(StateDelta::NotificationDismissed, ViewCause::Timer);
                }
            }
            TimerId::GestureReset => {
                self.gesture.expire();
            }
        }
    }

    /// Reduces a delta and records the view change it caused, if any.
    fn apply(&mut self, delta: StateDelta, cause: ViewCause) {
        let from = self.state.view();
        self.state.reduce(delta);
        let to = self.state.view();
        if from != to {
            debug!("View {:?} -> {:?}", from, to);
            self.telemetry
                .record(TelemetryEvent::ViewTransition { from, to, cause });
        }
    }

    /// Async Driver Loop. Runs until `shutdown` fires, then releases timers
    /// and in-flight service calls.
    pub async fn run<S: AssistantService>(
        &mut self,
        executor: &mut EffectExecutor<S>,
        shutdown: CancellationToken,
    ) {
        info!("Reactor Pipeline Started. Tick: {}ms", TICK_MS);

        let mut cadence = interval(Duration::from_millis(TICK_MS));
        cadence.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            // Driver: Wait for physical time boundary
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = cadence.tick() => {}
            }

            // Driver: Drain Events (Inputs + Service replies)
            let mut events: Vec<Event> = Vec::new();
            while let Ok(event) = self.receiver.try_recv() {
                events.push(event);
            }

            // Core: Execute Step
            let effects = self.tick_step(events);

            // Driver: Execute Side Effects
            for effect in effects {
                executor.execute(effect);
            }
        }

        self.shutdown();
        executor.shutdown();
    }
}
