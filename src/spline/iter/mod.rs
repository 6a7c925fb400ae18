//! Lazy segment iteration over a [`SplineData`] snapshot.
//!
//! Four layers compose by value: [`PrototypeSegmentIterator`] walks one copy of the inner-loop
//! prototype, [`LoopSegmentIterator`] replicates it across the loop counts,
//! [`KnotSegmentIterator`] covers the whole knot domain and splices in the loop output, and
//! [`SegmentIterator`] adds extrapolation rays and whole-span looping.
//!
//! [`SplineData`]: crate::spline::data::SplineData

mod knot;
mod looped;
mod prototype;
mod segments;

pub use knot::{KnotSection, KnotSegmentIterator};
pub use looped::LoopSegmentIterator;
pub use prototype::PrototypeSegmentIterator;
pub use segments::{SegmentIterator, SplineRegion};

use crate::foundation::core::{Time, TimeInterval};
use crate::spline::loop_params::LoopParams;

/// Index of the first time strictly greater than `t`.
pub(crate) fn upper_bound(times: &[Time], t: Time) -> usize {
    times.partition_point(|&x| x <= t)
}

/// Index of the first time not less than `t`.
pub(crate) fn lower_bound(times: &[Time], t: Time) -> usize {
    times.partition_point(|&x| x < t)
}

/// Index of the knot that begins the segment holding the leading edge of `interval`.
///
/// Reverse iteration keeps a knot sitting exactly on a closed upper bound, since that knot
/// begins the only segment reaching that time.
pub(crate) fn seek_segment_start(times: &[Time], interval: &TimeInterval, reversed: bool) -> usize {
    if reversed {
        let idx = lower_bound(times, interval.max);
        if interval.max_closed && times.get(idx) == Some(&interval.max) {
            idx
        } else {
            idx.saturating_sub(1)
        }
    } else {
        upper_bound(times, interval.min).saturating_sub(1)
    }
}

/// Looped interval with the upper bound opened, so a knot shared by the last loop copy and
/// the following authored knots is counted once.
pub(crate) fn open_looped_interval(lp: &LoopParams) -> TimeInterval {
    lp.looped_interval().with_max_open()
}

#[cfg(test)]
#[path = "../../../tests/unit/spline/iter.rs"]
mod tests;
