use super::*;

#[test]
fn all_ones_keeps_tail_bits_clear() {
    let m = Mask::all_ones(70);
    assert_eq!(m.size(), 70);
    assert_eq!(m.count_ones(), 70);
    assert!(m.is_all_ones());
    assert!(!m.is_set(70));
    assert_eq!(m, Mask::from_bits(std::iter::repeat_n(true, 70)));
}

#[test]
fn empty_is_about_size_not_bits() {
    assert!(Mask::default().is_empty());
    let zeros = Mask::new(4);
    assert!(!zeros.is_empty());
    assert!(zeros.is_all_zeros());
}

#[test]
fn set_or_append_adopts_then_unions() {
    let mut m = Mask::default();
    let a = Mask::from_bits([true, false, false]);
    m.set_or_append(&a);
    assert_eq!(m, a);

    m.set_or_append(&Mask::from_bits([false, false, true, false, true]));
    assert_eq!(m.to_string(), "10101");
}

#[test]
fn difference_and_intersection() {
    let mut m = Mask::from_bits([true, true, true, false]);
    m -= &Mask::from_bits([false, true]);
    assert_eq!(m.to_string(), "1010");

    let both = &m & &Mask::from_bits([true, true, false, false, true]);
    assert_eq!(both.to_string(), "10000");

    let either = &m | &Mask::from_bits([false, true]);
    assert_eq!(either.to_string(), "1110");
}

#[test]
fn set_grows_the_mask() {
    let mut m = Mask::new(2);
    m.set(130);
    assert_eq!(m.size(), 131);
    assert!(m.is_set(130));
    assert_eq!(m.count_ones(), 1);
}
