use neuralator::kernel::event::{Event, InputEvent};
use neuralator::kernel::gesture::{GestureOutcome, GestureState};
use neuralator::kernel::reactor::{Reactor, ReactorConfig};
use neuralator::kernel::scheduler::SideEffect;
use neuralator::kernel::view::{AppPanel, ViewMode};
use tokio::sync::mpsc;

fn reactor() -> Reactor {
    let (tx, rx) = mpsc::channel(100);
    Reactor::new(rx, tx, ReactorConfig { rng_seed: Some(3) })
}

fn press() -> Vec<Event> {
    vec![Event::Input(InputEvent::Press)]
}

#[test]
fn test_gesture_counter() {
    let mut g = GestureState::new();
    assert_eq!(g.press(), GestureOutcome::Counting(1));
    assert_eq!(g.press(), GestureOutcome::Counting(2));
    assert_eq!(g.press(), GestureOutcome::Toggle);
    assert_eq!(g.press_count(), 0);

    g.press();
    g.expire();
    assert_eq!(g.press(), GestureOutcome::Counting(1));
}

#[test]
fn test_triple_press_in_one_tick() {
    let mut r = reactor();
    let effects = r.tick_step(vec![
        Event::Input(InputEvent::Press),
        Event::Input(InputEvent::Press),
        Event::Input(InputEvent::Press),
    ]);

    assert!(r.state.witness_mode());
    assert_eq!(r.gesture.press_count(), 0);
    assert_eq!(effects, vec![SideEffect::StartRecognition]);
}

#[test]
fn test_spaced_presses_within_window() {
    let mut r = reactor();
    r.tick_step(press());
    r.tick_step(vec![]);
    r.tick_step(press());
    assert_eq!(r.gesture.press_count(), 2);
    r.tick_step(vec![]);
    r.tick_step(press());

    assert!(r.state.witness_mode());
}

#[test]
fn test_slow_presses_restart_the_count() {
    let mut r = reactor();
    r.tick_step(press());
    r.tick_step(press());
    for _ in 0..4 {
        r.tick_step(vec![]);
    }
    assert_eq!(r.gesture.press_count(), 0);

    r.tick_step(press());
    assert_eq!(r.gesture.press_count(), 1);
    assert!(!r.state.witness_mode());
}

#[test]
fn test_six_presses_toggle_twice() {
    let mut r = reactor();
    let effects = r.tick_step(vec![Event::Input(InputEvent::Press); 6]);
    assert!(!r.state.witness_mode());
    assert_eq!(
        effects,
        vec![SideEffect::StartRecognition, SideEffect::StopRecognition]
    );
}

#[test]
fn test_press_always_returns_to_face() {
    let mut r = reactor();
    r.tick_step(vec![
        Event::Input(InputEvent::OpenApp),
        Event::Input(InputEvent::ShowMap),
    ]);
    assert_eq!(r.state.view(), ViewMode::App(AppPanel::Map));

    r.tick_step(press());
    assert_eq!(r.state.view(), ViewMode::Face);
    assert!(!r.state.witness_mode());
}

#[test]
fn test_panel_navigation() {
    let mut r = reactor();
    r.tick_step(vec![Event::Input(InputEvent::ShowMap)]);
    assert_eq!(r.state.view(), ViewMode::Face, "map needs the app open");

    r.tick_step(vec![Event::Input(InputEvent::OpenApp)]);
    r.tick_step(vec![Event::Input(InputEvent::ToggleDebug)]);
    assert_eq!(r.state.view(), ViewMode::App(AppPanel::Debug));
    r.tick_step(vec![Event::Input(InputEvent::ToggleDebug)]);
    assert_eq!(r.state.view(), ViewMode::App(AppPanel::Dashboard));
    r.tick_step(vec![Event::Input(InputEvent::ShowMap)]);
    assert_eq!(r.state.view().panel(), Some(AppPanel::Map));
    r.tick_step(vec![Event::Input(InputEvent::CloseMap)]);
    assert_eq!(r.state.view(), ViewMode::App(AppPanel::Dashboard));

    r.tick_step(press());
    assert_eq!(r.state.view().panel(), None);
}
