mod common;

use common::{close, fix_east};
use monotrack_rs::engine::filter::{classify, FixFilter, FixVerdict, RejectReason};
use monotrack_rs::types::fix::Fix;

#[test]
fn non_finite_coordinates_are_dropped() {
    let mut filter = FixFilter::new();
    let bad = Fix::new(f64::NAN, 10.0, 0, Some(5.0));
    assert_eq!(
        filter.evaluate(&bad, None),
        FixVerdict::Drop(RejectReason::NonFiniteCoordinates)
    );

    let inf = Fix::new(1.0, f64::INFINITY, 0, Some(5.0));
    assert_eq!(
        filter.evaluate(&inf, None),
        FixVerdict::Drop(RejectReason::NonFiniteCoordinates)
    );
    assert!(filter.last_accepted().is_none());
}

#[test]
fn imprecise_fix_only_moves_live_position() {
    let fix = fix_east(0.0, 31.0);
    assert_eq!(
        classify(&fix, None, None),
        FixVerdict::LiveOnly(RejectReason::Imprecise)
    );

    let at_limit = fix_east(0.0, 30.0);
    assert_eq!(
        classify(&at_limit, None, None),
        FixVerdict::Accept { delta_meters: 0.0 }
    );
}

#[test]
fn accuracy_collapse_after_good_fix_is_dropped() {
    let mut filter = FixFilter::new();

    assert!(matches!(
        filter.evaluate(&fix_east(0.0, 20.0), None),
        FixVerdict::Accept { .. }
    ));
    assert_eq!(
        filter.evaluate(&fix_east(3.0, 45.0), None),
        FixVerdict::LiveOnly(RejectReason::Imprecise)
    );
    assert_eq!(
        filter.evaluate(&fix_east(6.0, 600.0), None),
        FixVerdict::Drop(RejectReason::AccuracyCollapse)
    );

    // The dropped fix does not become the previous accepted fix.
    let last = filter.last_accepted().expect("previous fix");
    assert_eq!(last.accuracy_meters, Some(45.0));
}

#[test]
fn poor_fix_after_poor_fix_is_not_escalated() {
    let previous = fix_east(0.0, 80.0);
    let fix = fix_east(10.0, 600.0);
    assert_eq!(
        classify(&fix, Some(&previous), None),
        FixVerdict::LiveOnly(RejectReason::Imprecise)
    );
}

#[test]
fn missing_accuracy_is_trusted() {
    let previous = fix_east(0.0, 5.0);
    let fix = Fix::new(0.0, 0.001, 0, None);
    assert!(matches!(
        classify(&fix, Some(&previous), None),
        FixVerdict::Accept { .. }
    ));
}

#[test]
fn sub_meter_movement_is_jitter() {
    let last_point = fix_east(0.0, 10.0);
    let fix = fix_east(0.5, 10.0);
    assert_eq!(
        classify(&fix, Some(&last_point), Some(&last_point)),
        FixVerdict::LiveOnly(RejectReason::Jitter)
    );
}

#[test]
fn first_point_of_segment_has_zero_delta() {
    let fix = fix_east(250.0, 8.0);
    assert_eq!(
        classify(&fix, None, None),
        FixVerdict::Accept { delta_meters: 0.0 }
    );
}

#[test]
fn accepted_fix_carries_distance_from_last_point() {
    let last_point = fix_east(10.0, 10.0);
    let fix = fix_east(25.0, 10.0);
    match classify(&fix, Some(&last_point), Some(&last_point)) {
        FixVerdict::Accept { delta_meters } => assert!(close(delta_meters, 15.0)),
        other => panic!("expected accept, got {:?}", other),
    }
}
