use super::*;
use crate::foundation::core::Point;
use crate::spline::data::SplineData;
use crate::spline::extrapolation::{ExtrapMode, Extrapolation};
use crate::spline::knot::{InterpMode, Knot};
use crate::spline::loop_params::LoopParams;
use crate::spline::segment::SegmentInterp;

const TIMES: [f64; 5] = [112.0, 137.0, 145.0, 155.0, 181.0];

#[test]
fn bounds_follow_sorted_search_conventions() {
    assert_eq!(lower_bound(&TIMES, 137.0), 1);
    assert_eq!(upper_bound(&TIMES, 137.0), 2);
    assert_eq!(lower_bound(&TIMES, 0.0), 0);
    assert_eq!(upper_bound(&TIMES, 999.0), 5);
}

#[test]
fn seek_forward_picks_knot_at_or_before_min() {
    let iv = TimeInterval::closed_open(140.0, 150.0);
    assert_eq!(seek_segment_start(&TIMES, &iv, false), 1);
    let on_knot = TimeInterval::closed_open(145.0, 150.0);
    assert_eq!(seek_segment_start(&TIMES, &on_knot, false), 2);
    let before = TimeInterval::closed_open(0.0, 1.0);
    assert_eq!(seek_segment_start(&TIMES, &before, false), 0);
}

#[test]
fn seek_reverse_respects_closed_max() {
    let open = TimeInterval::closed_open(120.0, 145.0);
    assert_eq!(seek_segment_start(&TIMES, &open, true), 1);
    let closed = TimeInterval::closed(120.0, 145.0);
    assert_eq!(seek_segment_start(&TIMES, &closed, true), 2);
    let inside = TimeInterval::closed_open(120.0, 150.0);
    assert_eq!(seek_segment_start(&TIMES, &inside, true), 2);
}

fn two_knots() -> SplineData {
    SplineData::from_knots([
        Knot::new(0.0, 0.0, InterpMode::Linear),
        Knot::new(2.0, 4.0, InterpMode::Linear),
    ])
}

#[test]
fn single_knot_yields_both_rays() {
    let data = SplineData::from_knots([Knot::new(1.0, 5.0, InterpMode::Linear)]);
    let segs: Vec<_> = SegmentIterator::new(&data, TimeInterval::everything()).collect();
    assert_eq!(segs.len(), 2);
    assert_eq!(segs[0].interp, SegmentInterp::PreExtrap);
    assert_eq!(segs[0].p1.x, 1.0);
    assert_eq!(segs[1].interp, SegmentInterp::PostExtrap);
    assert_eq!(segs[1].p0.y, 5.0);
}

#[test]
fn empty_spline_and_empty_interval_yield_nothing() {
    let empty = SplineData::default();
    assert!(SegmentIterator::new(&empty, TimeInterval::everything()).at_end());
    assert!(KnotSegmentIterator::new(&empty, TimeInterval::everything(), false).at_end());
    assert!(LoopSegmentIterator::new(&empty, TimeInterval::everything(), true).at_end());

    let data = two_knots();
    assert!(SegmentIterator::new(&data, TimeInterval::empty()).at_end());
}

#[test]
fn infinite_interval_over_looping_extrapolation_is_rejected() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let data = two_knots().with_post_extrapolation(ExtrapMode::LoopRepeat);
    let mut it = SegmentIterator::new(&data, TimeInterval::closed_open(0.0, f64::INFINITY));
    assert!(it.at_end());
    assert!(it.segment().is_none());
    it.advance();
    assert!(it.at_end());

    // The finite side may still be unbounded on the non-looping side.
    let it = SegmentIterator::new(&data, TimeInterval::closed_open(f64::NEG_INFINITY, 3.0));
    assert!(!it.at_end());
}

#[test]
fn linear_extrapolation_uses_adjacent_slope() {
    let data = two_knots()
        .with_pre_extrapolation(ExtrapMode::Linear)
        .with_post_extrapolation(ExtrapMode::Linear);
    let segs: Vec<_> = SegmentIterator::new(&data, TimeInterval::everything()).collect();
    assert_eq!(segs.len(), 3);
    assert_eq!(segs[0].derivative(0.0), 2.0);
    assert_eq!(segs[2].derivative(1.0), segs[1].derivative(1.0));
}

#[test]
fn linear_extrapolation_degrades_across_discontinuity() {
    let data = SplineData::from_knots([
        Knot::new(0.0, 0.0, InterpMode::Linear).with_pre_value(-1.0),
        Knot::new(2.0, 4.0, InterpMode::Linear),
    ])
    .with_pre_extrapolation(ExtrapMode::Linear);
    let first = SegmentIterator::new(&data, TimeInterval::everything())
        .segment()
        .unwrap();
    assert_eq!(first.interp, SegmentInterp::PreExtrap);
    assert_eq!(first.p0.y, 0.0);
    assert_eq!(first.p1.y, -1.0);
}

#[test]
fn value_block_extrapolation_tags_ray() {
    let data = two_knots()
        .with_post_extrapolation(Extrapolation::new(ExtrapMode::ValueBlock))
        .with_pre_extrapolation(Extrapolation::sloped(-3.0));
    let segs: Vec<_> = SegmentIterator::new(&data, TimeInterval::everything()).collect();
    assert_eq!(segs[0].interp, SegmentInterp::PreExtrap);
    assert_eq!(segs[0].p0.y, -3.0);
    assert_eq!(segs[2].interp, SegmentInterp::ValueBlock);
}

#[test]
fn regions_advance_in_time_order() {
    let data = two_knots();
    let mut it = SegmentIterator::new(&data, TimeInterval::closed_open(-1.0, 3.0));
    assert_eq!(it.region(), SplineRegion::PreExtrap);
    it.advance();
    assert_eq!(it.region(), SplineRegion::KnotInterp);
    it.advance();
    assert_eq!(it.region(), SplineRegion::PostExtrap);
    it.advance();
    assert!(it.at_end());
}

#[test]
fn knot_iterator_without_loops_walks_plain_knots() {
    let data = two_knots();
    let it = KnotSegmentIterator::new(&data, TimeInterval::everything(), true);
    assert_eq!(it.section(), KnotSection::PostInnerLooping);
    assert_eq!(it.count(), 1);
}

fn straddled_loop() -> SplineData {
    SplineData::from_knots([
        Knot::new(0.0, 0.0, InterpMode::Linear),
        Knot::new(10.0, 1.0, InterpMode::Linear),
        Knot::new(12.0, 3.0, InterpMode::Linear),
        Knot::new(20.0, 5.0, InterpMode::Linear),
        Knot::new(30.0, 2.0, InterpMode::Linear),
        Knot::new(35.0, 4.0, InterpMode::Linear),
    ])
    .with_loop_params(LoopParams::new(10.0, 12.0, 1, 2, 2.0))
}

#[test]
fn knot_iterator_crosses_virtual_loop_boundaries() {
    let data = straddled_loop();
    for (a, b, n) in [(0.0, 35.0, 8), (0.0, 12.0, 3), (14.0, 25.0, 3)] {
        let iv = TimeInterval::closed_open(a, b);
        let fwd: Vec<_> = KnotSegmentIterator::new(&data, iv, false).collect();
        let mut rev: Vec<_> = KnotSegmentIterator::new(&data, iv, true).collect();
        rev.reverse();
        assert_eq!(fwd.len(), n, "{iv}");
        assert_eq!(fwd, rev, "{iv}");
        for pair in fwd.windows(2) {
            assert_eq!(pair[0].p1, pair[1].p0, "{iv}");
        }
    }

    let after: Vec<_> =
        KnotSegmentIterator::new(&data, TimeInterval::closed_open(14.0, 25.0), false).collect();
    assert_eq!(after[1].p0, Point::new(16.0, 7.0));
    assert_eq!(after[1].p1, Point::new(20.0, 5.0));
}
