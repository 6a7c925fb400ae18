use super::*;
use crate::foundation::math::is_close;
use crate::spline::extrapolation::ExtrapMode;
use crate::spline::knot::InterpMode;

fn ramp() -> Spline {
    let mut s = Spline::new();
    s.set_knots([
        Knot::new(0.0, 0.0, InterpMode::Linear),
        Knot::new(1.0, 1.0, InterpMode::Linear),
        Knot::new(2.0, 3.0, InterpMode::Held),
    ]);
    s
}

#[test]
fn setters_detach_shared_snapshots() {
    let a = ramp();
    let mut b = a.clone();
    assert!(a.shares_data_with(&b));

    b.set_knot(Knot::new(5.0, 5.0, InterpMode::Linear));
    assert!(!a.shares_data_with(&b));
    assert_eq!(a.knots().len(), 3);
    assert_eq!(b.knots().len(), 4);
}

#[test]
fn iterator_over_old_snapshot_is_undisturbed() {
    let mut spline = ramp();
    let snapshot = spline.clone();
    let mut it = snapshot.segments(TimeInterval::closed_open(0.0, 2.0));
    let first = it.next().unwrap();

    spline.set_knots([Knot::new(0.0, 9.0, InterpMode::Held)]);
    spline.set_curve_type(CurveType::Hermite);

    assert_eq!(first.p1.y, 1.0);
    assert_eq!(it.next().unwrap().p1.y, 3.0);
    assert!(it.next().is_none());
    assert_eq!(spline.knots().len(), 1);
}

#[test]
fn eval_follows_segments_and_extrapolation() {
    let mut spline = ramp();
    assert_eq!(spline.eval(0.5), Some(0.5));
    assert_eq!(spline.eval(1.5), Some(2.0));
    assert_eq!(spline.eval(2.0), Some(3.0));
    assert_eq!(spline.eval(9.0), Some(3.0));
    assert_eq!(spline.eval(-4.0), Some(0.0));

    spline.set_pre_extrapolation(ExtrapMode::Linear);
    assert_eq!(spline.eval(-4.0), Some(-4.0));

    spline.set_post_extrapolation(ExtrapMode::ValueBlock);
    assert_eq!(spline.eval(9.0), None);
}

#[test]
fn eval_on_empty_spline_is_none() {
    assert_eq!(Spline::new().eval(1.0), None);
}

#[test]
fn eval_through_oscillating_copies() {
    let mut spline = Spline::new();
    spline.set_knots([
        Knot::new(0.0, 0.0, InterpMode::Linear),
        Knot::new(2.0, 4.0, InterpMode::Linear),
    ]);
    spline.set_post_extrapolation(ExtrapMode::LoopOscillate);
    spline.set_pre_extrapolation(ExtrapMode::LoopRepeat);

    // Odd copies run backwards.
    assert!(is_close(spline.eval(2.5).unwrap(), 3.0, 1e-12));
    assert!(is_close(spline.eval(2.0).unwrap(), 4.0, 1e-12));
    assert!(is_close(spline.eval(4.5).unwrap(), 1.0, 1e-12));

    // Repeat copies carry the span's value change.
    assert!(is_close(spline.eval(-1.0).unwrap(), -2.0, 1e-12));
}

#[test]
fn eval_inside_inner_loop_copies() {
    let mut spline = ramp();
    spline.set_inner_loop_params(LoopParams::new(0.0, 2.0, 0, 1, 3.0));
    // Post copy of [0, 2) lives at [2, 4) shifted up by 3.
    assert!(is_close(spline.eval(2.5).unwrap(), 3.5, 1e-12));
    assert!(is_close(spline.eval(3.5).unwrap(), 5.0, 1e-12));
}

#[test]
fn json_round_trip_preserves_data() {
    let mut spline = ramp();
    spline.set_inner_loop_params(LoopParams::new(0.0, 2.0, 1, 1, 3.0));
    spline.set_post_extrapolation(Extrapolation::sloped(0.5));
    let json = spline.to_json_string().unwrap();
    let back = Spline::from_json_str(&json).unwrap();
    assert_eq!(back, spline);
}

#[test]
fn from_json_rejects_invalid_data() {
    let err = Spline::from_json_str(r#"{"knots":[{"time":2.0,"value":0.0},{"time":1.0,"value":0.0}]}"#)
        .unwrap_err();
    assert!(err.to_string().starts_with("spline error:"));

    let err = Spline::from_json_str("{not json").unwrap_err();
    assert!(err.to_string().starts_with("serialization error:"));
}
