use std::iter::FusedIterator;

use crate::foundation::core::TimeInterval;
use crate::spline::data::SplineData;
use crate::spline::knot::Knot;
use crate::spline::segment::Segment;

use super::{LoopSegmentIterator, lower_bound, open_looped_interval, seek_segment_start, upper_bound};

/// Which part of the knot domain a [`KnotSegmentIterator`] is walking.
///
/// Sections are named for forward traversal; reverse traversal visits the knots after the
/// loop region under `PreInnerLooping`. Without inner loops every knot is walked under
/// `PostInnerLooping`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KnotSection {
    PreInnerLooping,
    InnerLooping,
    PostInnerLooping,
}

/// Segments across the whole authored knot domain, with loop copies spliced in.
#[derive(Clone, Debug)]
pub struct KnotSegmentIterator<'a> {
    data: &'a SplineData,
    interval: TimeInterval,
    reversed: bool,
    first_proto: Option<usize>,
    looped: TimeInterval,
    section: KnotSection,
    cursor: usize,
    loop_it: Option<LoopSegmentIterator<'a>>,
    segment: Option<Segment>,
}

impl<'a> KnotSegmentIterator<'a> {
    pub fn new(data: &'a SplineData, interval: TimeInterval, reversed: bool) -> Self {
        let first_proto = data.inner_loop_start();
        let looped = open_looped_interval(&data.loop_params);
        let mut it = Self {
            data,
            interval,
            reversed,
            first_proto,
            looped,
            section: KnotSection::PostInnerLooping,
            cursor: 0,
            loop_it: None,
            segment: None,
        };

        let times = &data.times;
        let (Some(&front), Some(&back)) = (times.first(), times.last()) else {
            return it;
        };
        if times.len() < 2 && first_proto.is_none() {
            return it;
        }

        let (mut first, mut last) = (front, back);
        if first_proto.is_some() {
            first = first.min(looped.min);
            last = last.max(looped.max);
        }
        it.interval &= TimeInterval::closed_open(first, last);
        if it.interval.is_empty() {
            return it;
        }
        let interval = it.interval;

        if first_proto.is_some() {
            it.section = if reversed {
                if back > looped.max && interval.max > looped.max {
                    KnotSection::PreInnerLooping
                } else if interval.max > looped.min {
                    KnotSection::InnerLooping
                } else if interval.max > front {
                    KnotSection::PostInnerLooping
                } else {
                    return it;
                }
            } else if front < looped.min && interval.min < looped.min {
                KnotSection::PreInnerLooping
            } else if interval.min < looped.max {
                KnotSection::InnerLooping
            } else if interval.min < back {
                KnotSection::PostInnerLooping
            } else {
                return it;
            };
        }

        if it.section == KnotSection::InnerLooping {
            it.loop_it = Some(LoopSegmentIterator::new(data, interval, reversed));
        } else {
            it.cursor = seek_segment_start(times, &interval, reversed);
        }
        it.segment = it.build_segment();
        it
    }

    pub fn at_end(&self) -> bool {
        self.segment.is_none()
    }

    pub fn segment(&self) -> Option<Segment> {
        self.segment
    }

    pub fn section(&self) -> KnotSection {
        self.section
    }

    pub fn advance(&mut self) {
        let Some(current) = self.segment else {
            return;
        };
        if self.step(current) {
            self.segment = self.build_segment();
        } else {
            self.segment = None;
        }
    }

    // Returns false when iteration is over.
    fn step(&mut self, current: Segment) -> bool {
        let times = &self.data.times;

        if self.section == KnotSection::InnerLooping {
            let Some(loop_it) = self.loop_it.as_mut() else {
                return false;
            };
            loop_it.advance();
            if !loop_it.at_end() {
                return true;
            }
            self.loop_it = None;

            let reached_boundary = if self.reversed {
                current.p0.x <= self.interval.min
            } else {
                current.p1.x >= self.interval.max
            };
            if reached_boundary {
                return false;
            }

            self.section = KnotSection::PostInnerLooping;
            if self.reversed {
                let idx = lower_bound(times, self.looped.min);
                if idx == 0 {
                    return false;
                }
                self.cursor = idx - 1;
            } else {
                let idx = upper_bound(times, self.looped.max);
                if idx == times.len() {
                    return false;
                }
                self.cursor = idx - 1;
            }
            return true;
        }

        // Segments next to the loop region end on a virtual knot, so the neighbouring
        // segment's boundary is read from the current segment rather than the knot times.
        if self.reversed {
            if current.p0.x <= self.interval.min {
                return false;
            }
            if self.section == KnotSection::PreInnerLooping && current.p0.x <= self.looped.max {
                self.enter_inner_loop();
            } else if self.cursor == 0 {
                return false;
            } else {
                self.cursor -= 1;
            }
        } else {
            if !self.interval.contains(current.p1.x) {
                return false;
            }
            if self.section == KnotSection::PreInnerLooping && current.p1.x >= self.looped.min {
                self.enter_inner_loop();
            } else {
                self.cursor += 1;
            }
        }
        true
    }

    fn enter_inner_loop(&mut self) {
        self.section = KnotSection::InnerLooping;
        self.loop_it = Some(LoopSegmentIterator::new(
            self.data,
            self.interval,
            self.reversed,
        ));
    }

    fn build_segment(&self) -> Option<Segment> {
        if self.section == KnotSection::InnerLooping {
            return self.loop_it.as_ref()?.segment();
        }

        let data = self.data;
        let lp = &data.loop_params;
        let prev_idx = self.cursor;
        let next_idx = prev_idx + 1;
        let (&prev_time, &next_time) = (data.times.get(prev_idx)?, data.times.get(next_idx)?);

        let mut prev = data.knots[prev_idx];
        let mut next = data.knots[next_idx];

        if let Some(first_proto) = self.first_proto {
            let proto: &Knot = &data.knots[first_proto];
            let span = lp.proto_span();
            let offset = lp.value_offset();

            // Knots running into the far end of the loop region start from the copy after
            // the last post-loop iteration.
            let toward_loop_end = match self.section {
                KnotSection::PreInnerLooping => self.reversed,
                KnotSection::PostInnerLooping => !self.reversed,
                KnotSection::InnerLooping => false,
            };
            if toward_loop_end && prev_time <= self.looped.max {
                let n = f64::from(lp.num_post_loops()) + 1.0;
                prev = proto.shifted(span * n, offset * n);
            }

            // Knots running into the near end of the loop region stop at the first pre-loop
            // copy.
            if !toward_loop_end && next_time >= self.looped.min {
                let n = f64::from(lp.num_pre_loops());
                next = proto.shifted(-span * n, -offset * n);
            }
        }

        Some(Segment::from_knots(&prev, &next, data.curve_type))
    }
}

impl Iterator for KnotSegmentIterator<'_> {
    type Item = Segment;

    fn next(&mut self) -> Option<Segment> {
        let seg = self.segment?;
        self.advance();
        Some(seg)
    }
}

impl FusedIterator for KnotSegmentIterator<'_> {}
