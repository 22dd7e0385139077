use neuralator::kernel::event::{Event, InputEvent};
use neuralator::kernel::overload::{OverloadAction, OverloadMonitor, OverloadState};
use neuralator::kernel::reactor::{Reactor, ReactorConfig};
use neuralator::kernel::scheduler::TimerId;
use neuralator::kernel::time::Tick;
use neuralator::kernel::view::{AppPanel, ViewMode};
use tokio::sync::mpsc;

fn reactor() -> Reactor {
    let (tx, rx) = mpsc::channel(100);
    Reactor::new(rx, tx, ReactorConfig { rng_seed: Some(11) })
}

fn heart_rate(bpm: i32) -> Vec<Event> {
    vec![Event::Input(InputEvent::SetExternalHeartRate(bpm))]
}

/// Drives the reactor in external-feed mode so heart rate only moves when we say.
fn feed_reactor() -> Reactor {
    let mut r = reactor();
    r.tick_step(vec![Event::Input(InputEvent::SetFeedEnabled(true))]);
    r
}

#[test]
fn test_monitor_enters_above_threshold() {
    let mut m = OverloadMonitor::new();
    assert_eq!(m.observe(115), None, "115 is not above the threshold");
    assert_eq!(m.observe(116), Some(OverloadAction::Entered));
    assert!(m.is_overloaded());
    assert_eq!(m.observe(130), None);
}

#[test]
fn test_monitor_uninterrupted_recovery() {
    let mut m = OverloadMonitor::new();
    assert_eq!(m.observe(120), Some(OverloadAction::Entered));
    assert_eq!(m.observe(95), Some(OverloadAction::ArmRecovery));
    for _ in 0..4 {
        // Already counting down; calm readings do not restart the delay.
        assert_eq!(m.observe(95), None);
    }
    assert!(m.recovery_elapsed());
    assert_eq!(m.state(), OverloadState::Normal);
}

#[test]
fn test_monitor_interrupted_recovery() {
    let mut m = OverloadMonitor::new();
    m.observe(120);
    assert_eq!(m.observe(95), Some(OverloadAction::ArmRecovery));
    assert!(m.recovery_armed());
    assert_eq!(m.observe(95), None);
    assert_eq!(m.observe(105), Some(OverloadAction::CancelRecovery));
    assert!(!m.recovery_armed());

    // A timer that fired after being cancelled must not clear overload.
    assert!(!m.recovery_elapsed());
    assert_eq!(m.state(), OverloadState::Overload);

    assert_eq!(m.observe(95), Some(OverloadAction::ArmRecovery));
    assert!(m.recovery_elapsed());
    assert_eq!(m.state(), OverloadState::Normal);
}

#[test]
fn test_monitor_band_between_thresholds_holds_state() {
    let mut m = OverloadMonitor::new();
    assert_eq!(m.observe(110), None);
    assert_eq!(m.state(), OverloadState::Normal);
    m.observe(120);
    assert_eq!(m.observe(110), None, "110 is neither calm nor a new overload");
    assert!(m.is_overloaded());
}

#[test]
fn test_overload_escalates_face_to_app() {
    let mut r = feed_reactor();
    assert_eq!(r.state.view(), ViewMode::Face);

    r.tick_step(heart_rate(120));
    assert_eq!(r.state.overload(), OverloadState::Overload);
    assert_eq!(r.state.view(), ViewMode::App(AppPanel::Dashboard));
}

#[test]
fn test_overload_recovers_after_five_calm_seconds() {
    let mut r = feed_reactor();
    r.tick_step(heart_rate(120));
    r.tick_step(heart_rate(95));
    assert_eq!(
        r.scheduler.deadline(TimerId::OverloadRecovery),
        Some(Tick { frame: 53 }),
        "armed on tick 3 for five seconds"
    );

    for _ in 0..49 {
        r.tick_step(vec![]);
    }
    assert_eq!(r.state.overload(), OverloadState::Overload, "still inside the delay");

    r.tick_step(vec![]);
    assert_eq!(r.state.overload(), OverloadState::Normal);
    assert_eq!(r.telemetry.snapshot().overload_stats.recovered, 1);
}

#[test]
fn test_overload_recovery_resets_on_relapse() {
    let mut r = feed_reactor();
    r.tick_step(heart_rate(120));

    // Two calm seconds, then a spike above 100 cancels the pending recovery.
    r.tick_step(heart_rate(95));
    for _ in 0..20 {
        r.tick_step(vec![]);
    }
    r.tick_step(heart_rate(105));
    assert!(!r.scheduler.is_armed(TimerId::OverloadRecovery));

    for _ in 0..100 {
        r.tick_step(vec![]);
    }
    assert_eq!(r.state.overload(), OverloadState::Overload, "no calm window, no recovery");

    // A full uninterrupted window clears it.
    r.tick_step(heart_rate(95));
    for _ in 0..50 {
        r.tick_step(vec![]);
    }
    assert_eq!(r.state.overload(), OverloadState::Normal);
}

#[test]
fn test_arrival_baseline_counts_as_calm() {
    let mut r = feed_reactor();
    r.tick_step(heart_rate(130));
    r.tick_step(vec![Event::Input(InputEvent::StartTravel {
        destination: "Blue Sensory Pod".to_string(),
        distance_m: 5,
    })]);
    for _ in 0..10 {
        r.tick_step(vec![]);
    }
    assert_eq!(r.state.bpm(), 70);
    assert!(r.scheduler.is_armed(TimerId::OverloadRecovery));
}
