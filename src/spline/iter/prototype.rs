use std::iter::FusedIterator;

use crate::foundation::core::TimeInterval;
use crate::spline::data::SplineData;
use crate::spline::segment::Segment;

use super::seek_segment_start;

/// Segments inside one copy of the inner-loop prototype, `[protoStart, protoEnd)`.
///
/// The last segment closes the cycle onto a virtual copy of the first prototype knot,
/// shifted by the prototype span and the loop value offset.
#[derive(Clone, Debug)]
pub struct PrototypeSegmentIterator<'a> {
    data: &'a SplineData,
    interval: TimeInterval,
    reversed: bool,
    first_proto: usize,
    cursor: usize,
    segment: Option<Segment>,
}

impl<'a> PrototypeSegmentIterator<'a> {
    pub fn new(data: &'a SplineData, interval: TimeInterval, reversed: bool) -> Self {
        let mut it = Self {
            data,
            interval,
            reversed,
            first_proto: 0,
            cursor: 0,
            segment: None,
        };

        let Some(first_proto) = data.inner_loop_start() else {
            return it;
        };
        let iter_interval = interval & data.loop_params.prototype_interval();
        if iter_interval.is_empty() {
            return it;
        }

        it.first_proto = first_proto;
        it.cursor = seek_segment_start(&data.times, &iter_interval, reversed);
        it.segment = it.build_segment();
        it
    }

    pub fn at_end(&self) -> bool {
        self.segment.is_none()
    }

    /// Current segment; `None` once the iterator is exhausted.
    pub fn segment(&self) -> Option<Segment> {
        self.segment
    }

    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    pub fn advance(&mut self) {
        if self.at_end() {
            return;
        }

        let times = &self.data.times;
        let lp = &self.data.loop_params;

        let done = if self.reversed {
            match times.get(self.cursor) {
                Some(&t) if self.cursor > 0 => {
                    t <= lp.proto_start() || t <= self.interval.min
                }
                _ => true,
            }
        } else {
            self.cursor += 1;
            match times.get(self.cursor) {
                Some(&t) => t >= lp.proto_end() || !self.interval.contains(t),
                None => true,
            }
        };

        if done {
            self.segment = None;
            return;
        }
        if self.reversed {
            self.cursor -= 1;
        }
        self.segment = self.build_segment();
    }

    fn build_segment(&self) -> Option<Segment> {
        let data = self.data;
        let lp = &data.loop_params;
        let prev = data.knots.get(self.cursor)?;

        let next_idx = self.cursor + 1;
        let next = match data.times.get(next_idx) {
            Some(&t) if t < lp.proto_end() => data.knots[next_idx],
            _ => data.knots[self.first_proto].shifted(lp.proto_span(), lp.value_offset()),
        };

        Some(Segment::from_knots(prev, &next, data.curve_type))
    }
}

impl Iterator for PrototypeSegmentIterator<'_> {
    type Item = Segment;

    fn next(&mut self) -> Option<Segment> {
        let seg = self.segment?;
        self.advance();
        Some(seg)
    }
}

impl FusedIterator for PrototypeSegmentIterator<'_> {}
