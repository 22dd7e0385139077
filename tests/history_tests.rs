use neuralator::kernel::history::{StressHistory, HISTORY_CAPACITY};
use neuralator::kernel::reactor::{Reactor, ReactorConfig};
use tokio::sync::mpsc;

#[test]
fn test_history_evicts_oldest_first() {
    let mut history = StressHistory::new();
    for value in 0..21 {
        history.push(value);
    }

    assert_eq!(history.len(), HISTORY_CAPACITY);
    let samples = history.snapshot();
    assert!(!samples.contains(&0), "first sample should be evicted");
    assert_eq!(samples.first(), Some(&1));
    assert_eq!(samples.last(), Some(&20));
    assert!(samples.windows(2).all(|w| w[0] < w[1]), "order preserved");
}

#[test]
fn test_history_never_exceeds_capacity() {
    let mut history = StressHistory::new();
    for value in 0..500 {
        history.push(value % 101);
        assert!(history.len() <= HISTORY_CAPACITY);
    }
    assert_eq!(history.latest(), Some(499 % 101));
}

#[test]
fn test_seeded_history() {
    let history = StressHistory::seeded(15, 15);
    assert_eq!(history.len(), 15);
    assert!(history.iter().all(|v| v == 15));

    let capped = StressHistory::seeded(50, 3);
    assert_eq!(capped.len(), HISTORY_CAPACITY);
}

#[test]
fn test_reactor_samples_every_three_seconds() {
    let (tx, rx) = mpsc::channel(100);
    let mut r = Reactor::new(rx, tx, ReactorConfig { rng_seed: Some(5) });
    assert_eq!(r.state.history().len(), 15);

    for _ in 0..29 {
        r.tick_step(vec![]);
    }
    assert_eq!(r.state.history().len(), 15);

    r.tick_step(vec![]);
    assert_eq!(r.state.history().len(), 16);
    assert_eq!(r.state.history().latest(), Some(r.state.burnout()));

    // 10 more samples fill and then roll the window.
    for _ in 0..300 {
        r.tick_step(vec![]);
    }
    assert_eq!(r.state.history().len(), HISTORY_CAPACITY);
}
