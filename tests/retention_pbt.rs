//! Property-Based Tests for the retention model
//!
//! Tests the following invariants:
//! - Study boost: new retention is min(1.0, retention + 0.2) and stays in [0, 1]
//! - Monotonicity: every study event adds exactly one to the study count
//! - Decay bounds: both laws stay in [0, 1] and never increase with elapsed time
//! - Curve determinism: identical inputs give identical samples

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;

use retention_engine::{DecayLaw, LearningItem, RetentionEngine, RetentionUnit};

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_retention() -> impl Strategy<Value = f64> {
    (0u64..=1000u64).prop_map(|v| v as f64 / 1000.0)
}

fn arb_elapsed_hours() -> impl Strategy<Value = f64> {
    prop_oneof![
        (0.0f64..=48.0f64),
        (0.0f64..=100_000.0f64),
        (-1000.0f64..0.0f64),
    ]
}

fn arb_law() -> impl Strategy<Value = DecayLaw> {
    prop_oneof![Just(DecayLaw::Hyperbolic), Just(DecayLaw::Exponential)]
}

fn arb_item() -> impl Strategy<Value = LearningItem> {
    (0u32..10_000u32, arb_retention(), 0i64..=365i64).prop_map(|(study_count, retention, days)| {
        let created = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        LearningItem {
            study_count,
            retention,
            created_at: created,
            last_studied_at: created + Duration::days(days),
        }
    })
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn study_boost_is_clamped(item in arb_item()) {
        let engine = RetentionEngine::default();
        let next = engine.apply_study_event(&item, item.last_studied_at).unwrap();

        prop_assert_eq!(next.retention, (item.retention + 0.2).min(1.0));
        prop_assert!((0.0..=1.0).contains(&next.retention));
    }

    #[test]
    fn study_count_strictly_increases(item in arb_item(), rounds in 1usize..20) {
        let engine = RetentionEngine::default();
        let mut state = item.clone();
        for _ in 0..rounds {
            let next = engine.apply_study_event(&state, state.last_studied_at).unwrap();
            prop_assert_eq!(next.study_count, state.study_count + 1);
            prop_assert!(next.retention >= state.retention);
            state = next;
        }
        prop_assert_eq!(state.created_at, item.created_at);
    }

    #[test]
    fn projection_stays_in_unit_range(hours in arb_elapsed_hours(), law in arb_law(), count in 0u32..100) {
        let engine = RetentionEngine::default();
        let unit = engine.project_retention(hours, count, law, RetentionUnit::Unit);
        let percent = engine.project_retention(hours, count, law, RetentionUnit::Percent);

        prop_assert!((0.0..=1.0).contains(&unit));
        prop_assert!((0.0..=100.0).contains(&percent));
        prop_assert!((percent - unit * 100.0).abs() < 1e-9);
    }

    #[test]
    fn projection_never_increases_with_time(a in 0.0f64..10_000.0, b in 0.0f64..10_000.0, law in arb_law()) {
        let engine = RetentionEngine::default();
        let (early, late) = if a <= b { (a, b) } else { (b, a) };
        let r_early = engine.project_retention(early, 0, law, RetentionUnit::Unit);
        let r_late = engine.project_retention(late, 0, law, RetentionUnit::Unit);
        prop_assert!(r_late <= r_early);
    }

    #[test]
    fn projected_item_never_exceeds_stored(item in arb_item(), hours in 0i64..10_000) {
        let engine = RetentionEngine::default();
        let now = item.last_studied_at + Duration::hours(hours);
        let projected = engine.project_item(&item, now).unwrap();
        prop_assert!(projected <= item.retention);
        prop_assert!(projected >= 0.0);
    }

    #[test]
    fn curve_is_deterministic(max_days in 0u32..200, step in 0u32..10) {
        let engine = RetentionEngine::default();
        let first: Vec<_> = engine.sample_curve(max_days, step).collect();
        let second: Vec<_> = engine.sample_curve(max_days, step).collect();

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.len() as u32, max_days / step.max(1) + 1);
        prop_assert_eq!(first[0].retention_percent, 100.0);
        for point in &first {
            prop_assert_eq!(*point, engine.current_point(point.day));
        }
    }
}
