use std::iter::FusedIterator;

use crate::foundation::core::{TimeInterval, Vec2};
use crate::foundation::math::floor_iteration;
use crate::spline::data::SplineData;
use crate::spline::segment::Segment;

use super::{PrototypeSegmentIterator, open_looped_interval};

/// Prototype segments replicated across every inner-loop copy.
///
/// Copy `k` (from `-numPreLoops` to `numPostLoops`) is shifted by `k` prototype spans in
/// time and `k` value offsets in value.
#[derive(Clone, Debug)]
pub struct LoopSegmentIterator<'a> {
    data: &'a SplineData,
    iter_interval: TimeInterval,
    reversed: bool,
    proto_span: f64,
    value_offset: f64,
    min_iteration: i32,
    max_iteration: i32,
    cur_iteration: i32,
    proto_it: Option<PrototypeSegmentIterator<'a>>,
}

impl<'a> LoopSegmentIterator<'a> {
    pub fn new(data: &'a SplineData, interval: TimeInterval, reversed: bool) -> Self {
        let lp = data.loop_params;
        let mut it = Self {
            data,
            iter_interval: TimeInterval::empty(),
            reversed,
            proto_span: lp.proto_span(),
            value_offset: lp.value_offset(),
            min_iteration: -lp.num_pre_loops(),
            max_iteration: lp.num_post_loops(),
            cur_iteration: 0,
            proto_it: None,
        };

        if !data.has_inner_loops() {
            return it;
        }
        let iter_interval = interval & open_looped_interval(&lp);
        if iter_interval.is_empty() {
            return it;
        }
        it.iter_interval = iter_interval;

        let mut cur = if reversed {
            let offset = iter_interval.max - lp.proto_start();
            let cur = floor_iteration(offset, it.proto_span);
            // A boundary on an iteration seam belongs to the earlier iteration, where it is
            // the exclusive end rather than a zero-width start.
            if f64::from(cur) * it.proto_span == offset {
                cur - 1
            } else {
                cur
            }
        } else {
            floor_iteration(iter_interval.min - lp.proto_start(), it.proto_span)
        };
        cur = cur.clamp(it.min_iteration, it.max_iteration);

        it.cur_iteration = cur;
        it.rebuild_prototype();
        it
    }

    pub fn at_end(&self) -> bool {
        self.proto_it.as_ref().is_none_or(|p| p.at_end())
    }

    /// Current segment, shifted into the current loop copy.
    pub fn segment(&self) -> Option<Segment> {
        let seg = self.proto_it.as_ref()?.segment()?;
        let k = f64::from(self.cur_iteration);
        Some(seg + Vec2::new(k * self.proto_span, k * self.value_offset))
    }

    /// Loop copy the current segment belongs to.
    pub fn iteration(&self) -> i32 {
        self.cur_iteration
    }

    pub fn advance(&mut self) {
        let Some(proto_it) = self.proto_it.as_mut() else {
            return;
        };
        if proto_it.at_end() {
            self.proto_it = None;
            return;
        }

        proto_it.advance();
        while self.proto_it.as_ref().is_some_and(|p| p.at_end()) {
            let next = if self.reversed {
                self.cur_iteration.checked_sub(1)
            } else {
                self.cur_iteration.checked_add(1)
            };
            match next {
                Some(n)
                    if (self.min_iteration..=self.max_iteration).contains(&n)
                        && !self.copy_is_past_interval(n) =>
                {
                    self.cur_iteration = n;
                }
                _ => {
                    self.proto_it = None;
                    return;
                }
            }
            self.rebuild_prototype();
        }
    }

    // Copies only move away from the interval once one lies wholly beyond it.
    fn copy_is_past_interval(&self, iteration: i32) -> bool {
        let lp = &self.data.loop_params;
        let delta = f64::from(iteration) * self.proto_span;
        let iv = &self.iter_interval;
        if self.reversed {
            lp.proto_end() + delta <= iv.min
        } else {
            let start = lp.proto_start() + delta;
            start > iv.max || (start == iv.max && !iv.max_closed)
        }
    }

    fn rebuild_prototype(&mut self) {
        let delta = f64::from(self.cur_iteration) * self.proto_span;
        let proto_interval = self.iter_interval.shift(-delta);
        self.proto_it = Some(PrototypeSegmentIterator::new(
            self.data,
            proto_interval,
            self.reversed,
        ));
    }
}

impl Iterator for LoopSegmentIterator<'_> {
    type Item = Segment;

    fn next(&mut self) -> Option<Segment> {
        let seg = self.segment()?;
        self.advance();
        Some(seg)
    }
}

impl FusedIterator for LoopSegmentIterator<'_> {}
