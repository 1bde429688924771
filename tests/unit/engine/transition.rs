use super::*;
use crate::animation::ease::Ease;

const DUR: f64 = 1300.0;

fn linear(t: f64) -> f64 {
    t
}

#[test]
fn default_state_rests_on_first_slide() {
    let s = SlideState::default();
    assert_eq!((s.current, s.previous, s.offset), (0, 0, 1));
    assert!(!s.is_animating());
    assert!(s.plan(0.0, DUR, &linear).is_none());
}

#[test]
fn begin_rejects_same_out_of_range_and_busy() {
    let s = SlideState::default();
    assert!(s.begin(0, 4, 0.0, DUR).is_none());
    assert!(s.begin(4, 4, 0.0, DUR).is_none());
    let running = s.begin(2, 4, 0.0, DUR).unwrap();
    assert!(running.begin(1, 4, 10.0, DUR).is_none());
}

#[test]
fn begin_records_offset_previous_and_end_time() {
    let s = SlideState::default().begin(3, 4, 100.0, DUR).unwrap();
    assert_eq!((s.current, s.previous, s.offset), (3, 0, 3));
    assert_eq!(s.phase, Phase::Animating { end_ms: 1400.0 });
    assert_eq!(s.direction(), Direction::Forward);

    let back = s.settle().begin(1, 4, 0.0, DUR).unwrap();
    assert_eq!((back.current, back.previous, back.offset), (1, 3, 2));
    assert_eq!(back.direction(), Direction::Backward);
}

#[test]
fn forward_plan_starts_on_previous_and_lists_span() {
    let s = SlideState::default().begin(2, 4, 0.0, DUR).unwrap();
    let p = s.plan(0.0, DUR, &linear).unwrap();
    assert_eq!(p.remaining_ms, DUR);
    assert_eq!(p.progress, 0.0);
    assert_eq!(p.indices, vec![2, 1, 0]);
    assert_eq!(p.direction, Direction::Forward);
    assert!(!p.snap);
}

#[test]
fn backward_plan_lists_span_upwards() {
    let s = SlideState {
        current: 3,
        ..SlideState::default()
    }
    .begin(1, 4, 0.0, DUR)
    .unwrap();
    let p = s.plan(0.0, DUR, &linear).unwrap();
    assert_eq!(p.progress, 3.0);
    assert_eq!(p.indices, vec![1, 2, 3]);
    assert_eq!(p.direction, Direction::Backward);
}

#[test]
fn midpoint_progress_with_linear_easing() {
    let s = SlideState::default().begin(1, 4, 0.0, DUR).unwrap();
    let p = s.plan(650.0, DUR, &linear).unwrap();
    assert_eq!(p.remaining_ms, 650.0);
    assert!((p.progress - 0.5).abs() < 1e-12);
}

#[test]
fn progress_stays_between_previous_and_current() {
    let s = SlideState::default().begin(3, 4, 0.0, DUR).unwrap();
    for step in 0..=26 {
        let now = f64::from(step) * 50.0;
        let p = s.plan(now, DUR, &Ease::InOutQuint).unwrap();
        assert!(
            (0.0..=3.0).contains(&p.progress),
            "progress {} at {now}",
            p.progress
        );
    }
}

#[test]
fn snap_below_threshold() {
    let s = SlideState::default().begin(1, 4, 0.0, DUR).unwrap();
    assert!(!s.plan(DUR - SNAP_THRESHOLD_MS, DUR, &linear).unwrap().snap);
    assert!(s.plan(DUR - SNAP_THRESHOLD_MS + 1.0, DUR, &linear).unwrap().snap);
    let overdue = s.plan(DUR + 500.0, DUR, &linear).unwrap();
    assert!(overdue.snap);
    assert_eq!(overdue.progress, 1.0);
}

#[test]
fn time_before_start_is_clamped() {
    let s = SlideState::default().begin(1, 4, 1000.0, DUR).unwrap();
    let p = s.plan(0.0, DUR, &linear).unwrap();
    assert_eq!(p.progress, 0.0);
}

#[test]
fn non_finite_easing_output_is_ignored() {
    let s = SlideState::default().begin(2, 4, 0.0, DUR).unwrap();
    let p = s.plan(100.0, DUR, &|_t: f64| f64::NAN).unwrap();
    assert_eq!(p.progress, 2.0);
}

#[test]
fn settle_resets_offset_and_phase() {
    let s = SlideState::default().begin(3, 4, 0.0, DUR).unwrap().settle();
    assert_eq!(
        s,
        SlideState {
            current: 3,
            previous: 0,
            offset: 1,
            phase: Phase::Idle
        }
    );
}
