use neuralator::kernel::classifier::{Classification, ADJUSTMENT_MAX, ADJUSTMENT_MIN};
use neuralator::kernel::history::{StressHistory, HISTORY_CAPACITY};
use neuralator::kernel::overload::{OverloadMonitor, OverloadState};
use neuralator::kernel::stress::{
    burnout_from_hrv, burnout_step, heart_rate_step, hrv_from_burnout, StressState, HRV_MAX, HRV_MIN,
};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;

proptest! {
    #[test]
    fn stress_state_always_in_range(burnout in any::<i32>(), bpm in any::<i32>(), delta in any::<i32>()) {
        let s = StressState::new(burnout, bpm).adjusted(delta);
        prop_assert!((0..=100).contains(&s.burnout()));
        prop_assert!((60..=180).contains(&s.bpm()));
    }

    #[test]
    fn random_walks_stay_bounded(seed in any::<u64>(), start in 0i32..=100) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut burnout = start;
        for _ in 0..50 {
            let next = burnout_step(burnout, &mut rng);
            prop_assert!((0..=100).contains(&next));
            prop_assert!((next - burnout).abs() <= 15);
            let bpm = heart_rate_step(next, &mut rng);
            prop_assert!((60..=180).contains(&bpm));
            burnout = next;
        }
    }

    #[test]
    fn hrv_mapping_is_monotone(a in 0i32..=200, b in 0i32..=200) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(burnout_from_hrv(lo) >= burnout_from_hrv(hi));
        prop_assert!((0..=100).contains(&burnout_from_hrv(a)));
    }

    #[test]
    fn synthetic_hrv_in_range(burnout in 0i32..=100) {
        let hrv = hrv_from_burnout(burnout);
        prop_assert!((HRV_MIN..=HRV_MAX).contains(&hrv));
    }

    #[test]
    fn history_is_bounded_and_ordered(values in prop::collection::vec(0i32..=100, 0..80)) {
        let mut history = StressHistory::new();
        for v in &values {
            history.push(*v);
        }
        prop_assert!(history.len() <= HISTORY_CAPACITY);
        let keep = values.len().min(HISTORY_CAPACITY);
        prop_assert_eq!(history.snapshot(), values[values.len() - keep..].to_vec());
    }

    #[test]
    fn classification_adjustment_clamped(adj in -1000i64..1000, severity in -5.0f64..5.0) {
        let c = Classification::from_json(&json!({ "stressAdjustment": adj, "severity": severity }));
        prop_assert!((ADJUSTMENT_MIN..=ADJUSTMENT_MAX).contains(&c.stress_adjustment));
        prop_assert!((0.0..=1.0).contains(&c.severity));
    }

    #[test]
    fn overload_never_enters_at_or_below_threshold(bpms in prop::collection::vec(40i32..=115, 1..50)) {
        let mut monitor = OverloadMonitor::new();
        for bpm in bpms {
            monitor.observe(bpm);
            prop_assert_eq!(monitor.state(), OverloadState::Normal);
        }
    }
}
