use std::iter::FusedIterator;

use crate::foundation::core::{Point, TimeInterval, Vec2};
use crate::foundation::math::floor_iteration;
use crate::spline::data::{KnotExtent, SplineData};
use crate::spline::extrapolation::{ExtrapMode, Extrapolation};
use crate::spline::segment::{Segment, SegmentInterp};

use super::KnotSegmentIterator;

/// Part of the time line a [`SegmentIterator`] is producing segments for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SplineRegion {
    /// Ray before the first knot.
    PreExtrap,
    /// Whole-span copies before the first knot.
    PreExtrapLoop,
    /// The knot domain itself.
    KnotInterp,
    /// Whole-span copies after the last knot.
    PostExtrapLoop,
    /// Ray after the last knot.
    PostExtrap,
}

/// The complete segment sequence of a spline over a time interval, forward in time.
///
/// Extrapolation rays are emitted as [`SegmentInterp::PreExtrap`] /
/// [`SegmentInterp::PostExtrap`] segments (or value blocks). Looping extrapolation replays the
/// whole knot span, mirroring odd copies for oscillation.
///
/// Iterating a looping side over an infinite bound is rejected: the iterator starts
/// exhausted and an error is logged.
#[derive(Clone, Debug)]
pub struct SegmentIterator<'a> {
    data: &'a SplineData,
    interval: TimeInterval,
    extent: Option<KnotExtent>,
    pre_looped: bool,
    post_looped: bool,
    region: SplineRegion,
    min_iteration: i32,
    max_iteration: i32,
    cur_iteration: i32,
    reversing: bool,
    shift1: f64,
    shift2: f64,
    value_shift: f64,
    knot_it: Option<KnotSegmentIterator<'a>>,
    segment: Option<Segment>,
}

impl<'a> SegmentIterator<'a> {
    pub fn new(data: &'a SplineData, interval: TimeInterval) -> Self {
        let mut it = Self {
            data,
            interval,
            extent: None,
            pre_looped: false,
            post_looped: false,
            region: SplineRegion::KnotInterp,
            min_iteration: 0,
            max_iteration: 0,
            cur_iteration: 0,
            reversing: false,
            shift1: 0.0,
            shift2: 0.0,
            value_shift: 0.0,
            knot_it: None,
            segment: None,
        };

        if interval.is_empty() {
            return it;
        }
        let Some(ext) = data.knot_extent() else {
            return it;
        };
        it.extent = Some(ext);

        // Looping needs more than one distinct knot time to replay.
        let multi_knot = ext.first_time < ext.last_time;
        it.pre_looped = multi_knot && data.pre_extrapolation.is_looping();
        it.post_looped = multi_knot && data.post_extrapolation.is_looping();
        if (it.pre_looped && !interval.is_min_finite())
            || (it.post_looped && !interval.is_max_finite())
        {
            tracing::error!(
                %interval,
                "cannot iterate an infinitely looping spline across an infinite time interval"
            );
            return it;
        }

        if it.pre_looped || it.post_looped {
            let span = ext.span();
            let mut lo = floor_iteration(interval.min - ext.first_time, span);
            let mut hi = floor_iteration(interval.max - ext.first_time, span);
            if !it.pre_looped {
                lo = lo.max(0);
                hi = hi.max(0);
            }
            if !it.post_looped {
                lo = lo.min(0);
                hi = hi.min(0);
            }
            it.min_iteration = lo;
            it.max_iteration = hi;
        }
        it.cur_iteration = it.min_iteration;

        it.region = if interval.min < ext.first_time {
            if it.pre_looped {
                SplineRegion::PreExtrapLoop
            } else {
                SplineRegion::PreExtrap
            }
        } else if interval.min < ext.last_time {
            SplineRegion::KnotInterp
        } else if it.post_looped {
            SplineRegion::PostExtrapLoop
        } else {
            SplineRegion::PostExtrap
        };

        let live = it.update_knot_iterator().unwrap_or(true);
        it.segment = if live { it.build_segment() } else { None };
        it
    }

    pub fn at_end(&self) -> bool {
        self.segment.is_none()
    }

    pub fn segment(&self) -> Option<Segment> {
        self.segment
    }

    /// Region the current segment comes from.
    pub fn region(&self) -> SplineRegion {
        self.region
    }

    /// Whole-span copy the current segment belongs to; 0 outside looping extrapolation.
    pub fn iteration(&self) -> i32 {
        self.cur_iteration
    }

    pub fn advance(&mut self) {
        if self.segment.is_none() {
            return;
        }

        if self.region == SplineRegion::PostExtrap {
            self.segment = None;
            return;
        }

        if self.region == SplineRegion::PreExtrap {
            self.region = SplineRegion::KnotInterp;
            self.cur_iteration = 0;
            // A single knot leaves no knot segments; fall through to post-extrapolation.
            self.update_knot_iterator();
        } else if let Some(knot_it) = self.knot_it.as_mut() {
            knot_it.advance();
        }

        if self.knot_at_end() {
            if let Some(next) = self.cur_iteration.checked_add(1) {
                self.cur_iteration = next;
                self.update_knot_iterator();
            } else {
                self.knot_it = None;
            }
        }

        if self.knot_at_end() {
            let past_last = self
                .extent
                .is_some_and(|ext| self.interval.max > ext.last_time);
            if !self.post_looped && past_last {
                self.region = SplineRegion::PostExtrap;
            } else {
                self.segment = None;
                return;
            }
        }

        self.segment = self.build_segment();
    }

    fn knot_at_end(&self) -> bool {
        self.knot_it.as_ref().is_none_or(|k| k.at_end())
    }

    /// Rebuild the knot iterator for the current whole-span copy.
    ///
    /// Returns `None` for the ray regions, which do not use a knot iterator; otherwise whether
    /// the new knot iterator has segments.
    fn update_knot_iterator(&mut self) -> Option<bool> {
        if matches!(
            self.region,
            SplineRegion::PreExtrap | SplineRegion::PostExtrap
        ) {
            return None;
        }
        let ext = self.extent?;

        if self.cur_iteration > self.max_iteration {
            self.knot_it = None;
            return Some(false);
        }

        let k = self.cur_iteration;
        let time_delta = f64::from(k) * ext.span();
        let side: Option<&Extrapolation> = match k.signum() {
            -1 => Some(&self.data.pre_extrapolation),
            1 => Some(&self.data.post_extrapolation),
            _ => None,
        };
        let oscillating = side.is_some_and(|e| e.mode == ExtrapMode::LoopOscillate);
        self.value_shift = match side {
            Some(e) if e.mode == ExtrapMode::LoopRepeat => {
                f64::from(k) * (ext.last_value - ext.first_value)
            }
            _ => 0.0,
        };
        self.reversing = oscillating && k % 2 != 0;

        let knot_interval = if self.reversing {
            // Mirror the copy onto the knot span: t -> -(t - shift1) + shift2.
            self.shift1 = time_delta + ext.first_time;
            self.shift2 = ext.last_time;
            self.value_shift = 0.0;
            let t1 = -(self.interval.min - self.shift1) + self.shift2;
            let t0 = -(self.interval.max - self.shift1) + self.shift2;
            TimeInterval::closed_open(t0, t1)
        } else {
            self.shift1 = time_delta;
            self.shift2 = 0.0;
            self.interval.shift(-self.shift1)
        };

        let knot_it = KnotSegmentIterator::new(self.data, knot_interval, self.reversing);
        let live = !knot_it.at_end();
        self.knot_it = Some(knot_it);
        Some(live)
    }

    fn build_segment(&self) -> Option<Segment> {
        let ext = self.extent?;
        match self.region {
            SplineRegion::PreExtrap => Some(self.pre_extrap_segment(&ext)),
            SplineRegion::PostExtrap => Some(self.post_extrap_segment(&ext)),
            _ => {
                let seg = self.knot_it.as_ref()?.segment()?;
                Some(if self.reversing {
                    -(seg - self.shift2) + self.shift1
                } else {
                    seg + Vec2::new(self.shift1, self.value_shift)
                })
            }
        }
    }

    fn pre_extrap_segment(&self, ext: &KnotExtent) -> Segment {
        let extrap = self.data.pre_extrapolation;
        let end = Point::new(ext.first_time, ext.first_pre_value);
        let slope = self.ray_slope(extrap, ext.first_pre_value, ext.first_value, ext, false);
        Segment::pre_extrap(end, slope, ray_interp(extrap, SegmentInterp::PreExtrap))
    }

    fn post_extrap_segment(&self, ext: &KnotExtent) -> Segment {
        let extrap = self.data.post_extrapolation;
        let start = Point::new(ext.last_time, ext.last_value);
        let slope = self.ray_slope(extrap, ext.last_pre_value, ext.last_value, ext, true);
        Segment::post_extrap(start, slope, ray_interp(extrap, SegmentInterp::PostExtrap))
    }

    // Linear extrapolation across a dual-valued boundary knot degrades to a flat ray.
    fn ray_slope(
        &self,
        extrap: Extrapolation,
        pre_value: f64,
        value: f64,
        ext: &KnotExtent,
        post: bool,
    ) -> f64 {
        match extrap.mode {
            ExtrapMode::Sloped => extrap.slope,
            ExtrapMode::Linear if pre_value == value => {
                let span = TimeInterval::closed(ext.first_time, ext.last_time);
                KnotSegmentIterator::new(self.data, span, post)
                    .segment()
                    .map_or(0.0, |seg| seg.derivative(if post { 1.0 } else { 0.0 }))
            }
            _ => 0.0,
        }
    }
}

fn ray_interp(extrap: Extrapolation, ray: SegmentInterp) -> SegmentInterp {
    if extrap.mode == ExtrapMode::ValueBlock {
        SegmentInterp::ValueBlock
    } else {
        ray
    }
}

impl Iterator for SegmentIterator<'_> {
    type Item = Segment;

    fn next(&mut self) -> Option<Segment> {
        let seg = self.segment?;
        self.advance();
        Some(seg)
    }
}

impl FusedIterator for SegmentIterator<'_> {}
