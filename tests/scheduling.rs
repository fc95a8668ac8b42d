//! Time-point scheduler properties.

use regif::{RegifError, TICKS_PER_SECOND, TimePoint, schedule};

#[test]
fn five_frames_over_ten_seconds() {
    let points = schedule(TimePoint::from_seconds(10.0), 5).expect("schedule failed");
    let seconds: Vec<f64> = points.iter().map(TimePoint::as_seconds).collect();
    assert_eq!(seconds, vec![0.0, 2.0, 4.0, 6.0, 8.0]);
}

#[test]
fn single_frame_lands_at_zero() {
    let points = schedule(TimePoint::from_seconds(42.0), 1).expect("schedule failed");
    assert_eq!(points, vec![TimePoint::ZERO]);
}

#[test]
fn point_count_matches_request() {
    for frame_count in [1, 2, 3, 10, 100, 999] {
        let points = schedule(TimePoint::from_seconds(7.3), frame_count).expect("schedule failed");
        assert_eq!(points.len(), frame_count as usize);
    }
}

#[test]
fn points_are_monotonic_and_span_the_duration() {
    let duration = TimePoint::from_seconds(93.7);
    let points = schedule(duration, 24).expect("schedule failed");

    assert_eq!(points[0], TimePoint::ZERO, "first point must be at offset 0");
    for pair in points.windows(2) {
        assert!(pair[0] <= pair[1], "points must be non-decreasing");
    }
    assert!(
        *points.last().unwrap() < duration,
        "last point must fall strictly before the duration"
    );
}

#[test]
fn spacing_is_uniform_to_tick_resolution() {
    let duration = TimePoint::from_seconds(60.0);
    let frame_count = 7;
    let points = schedule(duration, frame_count).expect("schedule failed");

    let increment = duration.as_seconds() / f64::from(frame_count);
    let tick = 1.0 / f64::from(TICKS_PER_SECOND);
    for pair in points.windows(2) {
        let gap = pair[1].as_seconds() - pair[0].as_seconds();
        assert!(
            (gap - increment).abs() <= tick,
            "gap {gap} deviates from increment {increment} by more than one tick"
        );
    }
}

#[test]
fn long_durations_do_not_drift() {
    // Two hours at 600 ticks/s; the last of 500 points must still land
    // exactly where the rational arithmetic puts it.
    let duration = TimePoint::from_seconds(7200.0);
    let points = schedule(duration, 500).expect("schedule failed");

    let increment = duration.as_seconds() / 500.0;
    let expected_last = TimePoint::from_seconds(increment * 499.0);
    assert_eq!(*points.last().unwrap(), expected_last);
}

#[test]
fn zero_frame_count_is_rejected() {
    let result = schedule(TimePoint::from_seconds(10.0), 0);
    assert!(matches!(result, Err(RegifError::InvalidFrameCount)));
}

#[test]
fn zero_duration_is_rejected() {
    let result = schedule(TimePoint::ZERO, 5);
    assert!(matches!(result, Err(RegifError::EmptyDuration)));
}

#[test]
fn seconds_round_to_nearest_tick() {
    // 600 ticks/s: one tick is ~1.667 ms.
    assert_eq!(TimePoint::from_seconds(1.0).ticks(), 600);
    assert_eq!(TimePoint::from_seconds(0.5).ticks(), 300);
    // 0.0004 s is below half a tick and rounds down to zero.
    assert_eq!(TimePoint::from_seconds(0.0004).ticks(), 0);
    // 0.001 s is above half a tick and rounds up.
    assert_eq!(TimePoint::from_seconds(0.001).ticks(), 1);
}

#[test]
fn approx_eq_uses_symmetric_tolerance() {
    let point = TimePoint::from_seconds(2.0);
    assert!(point.approx_eq(TimePoint::from_seconds(2.009), 0.01));
    assert!(point.approx_eq(TimePoint::from_seconds(1.991), 0.01));
    assert!(!point.approx_eq(TimePoint::from_seconds(2.02), 0.01));
}

#[test]
fn ordering_is_exact() {
    let earlier = TimePoint::from_ticks(599);
    let later = TimePoint::from_ticks(600);
    assert!(earlier < later);
    assert_eq!(later, TimePoint::from_seconds(1.0));
}
