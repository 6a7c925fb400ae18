use super::*;

#[test]
fn closed_open_contains_boundaries() {
    let r = TimeInterval::closed_open(2.0, 5.0);
    assert!(!r.contains(1.999));
    assert!(r.contains(2.0));
    assert!(r.contains(4.999));
    assert!(!r.contains(5.0));
}

#[test]
fn degenerate_intervals() {
    assert!(!TimeInterval::point(3.0).is_empty());
    assert!(TimeInterval::closed_open(3.0, 3.0).is_empty());
    assert!(TimeInterval::empty().is_empty());
    assert!(TimeInterval::closed(4.0, 3.0).is_empty());
}

#[test]
fn intersection_closes_only_when_both_bounds_close() {
    let a = TimeInterval::closed(0.0, 10.0);
    let b = TimeInterval::closed_open(5.0, 10.0);
    let c = a & b;
    assert_eq!(c, TimeInterval::closed_open(5.0, 10.0));

    let d = TimeInterval::closed_open(0.0, 5.0) & TimeInterval::closed(5.0, 9.0);
    assert!(d.is_empty());
}

#[test]
fn intersection_with_everything_is_identity() {
    let a = TimeInterval::closed_open(-3.5, 7.25);
    assert_eq!(a & TimeInterval::everything(), a);
    assert!(!TimeInterval::everything().is_min_finite());
    assert!(!TimeInterval::everything().is_max_finite());
}

#[test]
fn shift_keeps_closure() {
    let a = TimeInterval::closed_open(1.0, 2.0).shift(-10.0);
    assert_eq!(a, TimeInterval::closed_open(-9.0, -8.0));
    assert_eq!(a.with_max_open(), a);
    assert!(!TimeInterval::closed(0.0, 1.0).with_max_open().max_closed);
}

#[test]
fn display_marks_bounds() {
    assert_eq!(TimeInterval::closed_open(1.0, 2.0).to_string(), "[1, 2)");
}
