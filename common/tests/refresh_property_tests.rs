// Property-based tests for the aligned refresh computation

use chrono::{DateTime, Duration, TimeZone, Timelike, Utc};
use common::refresh::{describe_refresh, next_refresh_at, refresh_delay, REFRESH_MINUTE};
use proptest::prelude::*;

/// Reference instants between 2000-01-01 and 2100-01-01 with millisecond
/// precision
fn arbitrary_reference() -> impl Strategy<Value = DateTime<Utc>> {
    (946_684_800i64..4_102_444_800i64, 0u32..1_000u32)
        .prop_map(|(secs, millis)| Utc.timestamp_opt(secs, millis * 1_000_000).unwrap())
}

proptest! {
    /// *For any* reference instant, the computed target is strictly in
    /// the future.
    #[test]
    fn property_target_strictly_future(reference in arbitrary_reference()) {
        let target = next_refresh_at(&reference).unwrap();
        prop_assert!(target > reference);
    }

    /// *For any* reference instant, the target lands exactly on the
    /// minute-:10 boundary with zeroed seconds and sub-seconds.
    #[test]
    fn property_target_minute_aligned(reference in arbitrary_reference()) {
        let target = next_refresh_at(&reference).unwrap();
        prop_assert_eq!(target.minute(), REFRESH_MINUTE);
        prop_assert_eq!(target.second(), 0);
        prop_assert_eq!(target.nanosecond(), 0);
    }

    /// *For any* reference instant, the delay is positive and strictly
    /// under two hours.
    #[test]
    fn property_delay_bounded_by_two_hours(reference in arbitrary_reference()) {
        let target = next_refresh_at(&reference).unwrap();
        let delay = refresh_delay(&reference, &target).unwrap();
        prop_assert!(delay > Duration::zero());
        prop_assert!(delay < Duration::hours(2));
    }

    /// *For any* reference instant, repeated computation yields the same
    /// target and the same delay.
    #[test]
    fn property_computation_deterministic(reference in arbitrary_reference()) {
        let first = next_refresh_at(&reference).unwrap();
        let second = next_refresh_at(&reference).unwrap();
        prop_assert_eq!(first, second);
        prop_assert_eq!(
            refresh_delay(&reference, &first).unwrap(),
            refresh_delay(&reference, &second).unwrap()
        );
    }

    /// *For any* reference instant, the diagnostic line reports the delay
    /// as milliseconds divided by 1000 and the target's clock time.
    #[test]
    fn property_diagnostic_consistency(reference in arbitrary_reference()) {
        let target = next_refresh_at(&reference).unwrap();
        let delay = refresh_delay(&reference, &target).unwrap();
        let line = describe_refresh(delay, &target);

        let seconds = delay.num_milliseconds() as f64 / 1000.0;
        prop_assert!(
            line.contains(&format!("in {} seconds", seconds)),
            "diagnostic line missing expected seconds"
        );
        prop_assert!(line.contains(&target.format("%H:%M:%S").to_string()));
    }
}
