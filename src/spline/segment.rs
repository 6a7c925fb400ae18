use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use crate::foundation::core::{Point, Time, Vec2};
use crate::foundation::math::is_close;
use crate::spline::knot::{CurveType, InterpMode, Knot};

/// Interpolation kind of a produced [`Segment`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SegmentInterp {
    #[default]
    ValueBlock,
    Held,
    Linear,
    Bezier,
    Hermite,
    /// Ray from `-inf`; `p0.y` holds the slope.
    PreExtrap,
    /// Ray to `+inf`; `p1.y` holds the slope.
    PostExtrap,
}

impl SegmentInterp {
    /// Resolve a knot's authored interpolation against the spline's curve type.
    pub fn from_interp_mode(mode: InterpMode, curve_type: CurveType) -> Self {
        match mode {
            InterpMode::ValueBlock => Self::ValueBlock,
            InterpMode::Held => Self::Held,
            InterpMode::Linear => Self::Linear,
            InterpMode::Curve => match curve_type {
                CurveType::Bezier => Self::Bezier,
                CurveType::Hermite => Self::Hermite,
            },
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::ValueBlock => "ValueBlock",
            Self::Held => "Held",
            Self::Linear => "Linear",
            Self::Bezier => "Bezier",
            Self::Hermite => "Hermite",
            Self::PreExtrap => "PreExtrap",
            Self::PostExtrap => "PostExtrap",
        }
    }
}

impl std::fmt::Display for SegmentInterp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One piece of a spline between two (possibly synthetic) knots.
///
/// Points are `(time, value)`. `t0` and `t1` are absolute tangent endpoints. For
/// [`SegmentInterp::PreExtrap`] the `p0` time is `-inf` and `p0.y` is the ray slope;
/// [`SegmentInterp::PostExtrap`] mirrors that on `p1`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub p0: Point,
    pub t0: Point,
    pub t1: Point,
    pub p1: Point,
    pub interp: SegmentInterp,
}

impl Default for Segment {
    fn default() -> Self {
        Self {
            p0: Point::ZERO,
            t0: Point::ZERO,
            t1: Point::ZERO,
            p1: Point::ZERO,
            interp: SegmentInterp::ValueBlock,
        }
    }
}

impl Segment {
    pub fn new(p0: Point, t0: Point, t1: Point, p1: Point, interp: SegmentInterp) -> Self {
        Self {
            p0,
            t0,
            t1,
            p1,
            interp,
        }
    }

    /// Segment from `prev` to `next`, using `prev`'s outgoing tangent and `next`'s
    /// incoming tangent. The segment ends on `next`'s pre-value.
    pub fn from_knots(prev: &Knot, next: &Knot, curve_type: CurveType) -> Self {
        let p0 = Point::new(prev.time, prev.value);
        let p1 = Point::new(next.time, next.pre_value());
        Self {
            p0,
            t0: p0 + Vec2::new(prev.post_tan_width, prev.post_tan_height()),
            t1: p1 + Vec2::new(-next.pre_tan_width, next.pre_tan_height()),
            p1,
            interp: SegmentInterp::from_interp_mode(prev.next_interp, curve_type),
        }
    }

    /// Ray segment ending at `end` with the given slope.
    pub fn pre_extrap(end: Point, slope: f64, interp: SegmentInterp) -> Self {
        Self {
            p0: Point::new(f64::NEG_INFINITY, slope),
            t0: Point::ZERO,
            t1: Point::ZERO,
            p1: end,
            interp,
        }
    }

    /// Ray segment starting at `start` with the given slope.
    pub fn post_extrap(start: Point, slope: f64, interp: SegmentInterp) -> Self {
        Self {
            p0: start,
            t0: Point::ZERO,
            t1: Point::ZERO,
            p1: Point::new(f64::INFINITY, slope),
            interp,
        }
    }

    /// Time range covered by the segment.
    pub fn start_time(&self) -> Time {
        self.p0.x
    }

    pub fn end_time(&self) -> Time {
        self.p1.x
    }

    /// Compare every coordinate with [`is_close`] and the interpolation kind exactly.
    pub fn is_close(&self, other: &Self, tol: f64) -> bool {
        let pt = |a: Point, b: Point| is_close(a.x, b.x, tol) && is_close(a.y, b.y, tol);
        self.interp == other.interp
            && pt(self.p0, other.p0)
            && pt(self.t0, other.t0)
            && pt(self.t1, other.t1)
            && pt(self.p1, other.p1)
    }

    /// dv/dt at parameter `u`, clamped to `[0, 1]`.
    ///
    /// Curved segments only support the endpoints `u == 0` and `u == 1`.
    pub fn derivative(&self, u: f64) -> f64 {
        let u = u.clamp(0.0, 1.0);
        match self.interp {
            SegmentInterp::ValueBlock | SegmentInterp::Held => 0.0,
            SegmentInterp::Linear => (self.p1.y - self.p0.y) / (self.p1.x - self.p0.x),
            SegmentInterp::PreExtrap => self.p0.y,
            SegmentInterp::PostExtrap => self.p1.y,
            SegmentInterp::Bezier | SegmentInterp::Hermite => {
                if u != 0.0 && u != 1.0 {
                    tracing::error!(u, "curved segment derivative is only defined at u = 0 or 1");
                    debug_assert!(u == 0.0 || u == 1.0, "unsupported derivative parameter {u}");
                }
                let tangent = if u <= 0.5 {
                    self.t0 - self.p0
                } else {
                    self.p1 - self.t1
                };
                tangent.y / tangent.x
            }
        }
    }

    /// Value at `time`, or `None` for value-blocked segments.
    ///
    /// Times outside `[p0.x, p1.x]` are clamped for finite segments.
    pub fn eval(&self, time: Time) -> Option<f64> {
        match self.interp {
            SegmentInterp::ValueBlock => None,
            SegmentInterp::Held => Some(self.p0.y),
            SegmentInterp::PreExtrap => Some(self.p1.y + self.p0.y * (time - self.p1.x)),
            SegmentInterp::PostExtrap => Some(self.p0.y + self.p1.y * (time - self.p0.x)),
            SegmentInterp::Linear => {
                let dt = self.p1.x - self.p0.x;
                if dt <= 0.0 {
                    return Some(self.p0.y);
                }
                let s = ((time - self.p0.x) / dt).clamp(0.0, 1.0);
                Some(self.p0.y + (self.p1.y - self.p0.y) * s)
            }
            SegmentInterp::Bezier => {
                if time <= self.p0.x {
                    return Some(self.p0.y);
                }
                if time >= self.p1.x {
                    return Some(self.p1.y);
                }
                let u = solve_bezier_time(self.p0.x, self.t0.x, self.t1.x, self.p1.x, time);
                Some(bezier(self.p0.y, self.t0.y, self.t1.y, self.p1.y, u))
            }
            SegmentInterp::Hermite => {
                let h = self.p1.x - self.p0.x;
                if h <= 0.0 {
                    return Some(self.p0.y);
                }
                let s = ((time - self.p0.x) / h).clamp(0.0, 1.0);
                let slope = |v: Vec2| if v.x == 0.0 { 0.0 } else { v.y / v.x };
                let m0 = slope(self.t0 - self.p0);
                let m1 = slope(self.p1 - self.t1);
                let s2 = s * s;
                let s3 = s2 * s;
                let h00 = 2.0 * s3 - 3.0 * s2 + 1.0;
                let h10 = s3 - 2.0 * s2 + s;
                let h01 = -2.0 * s3 + 3.0 * s2;
                let h11 = s3 - s2;
                Some(h00 * self.p0.y + h10 * h * m0 + h01 * self.p1.y + h11 * h * m1)
            }
        }
    }
}

fn bezier(a0: f64, a1: f64, a2: f64, a3: f64, u: f64) -> f64 {
    let omu = 1.0 - u;
    omu * omu * omu * a0 + 3.0 * omu * omu * u * a1 + 3.0 * omu * u * u * a2 + u * u * u * a3
}

fn bezier_derivative(a0: f64, a1: f64, a2: f64, a3: f64, u: f64) -> f64 {
    let omu = 1.0 - u;
    3.0 * omu * omu * (a1 - a0) + 6.0 * omu * u * (a2 - a1) + 3.0 * u * u * (a3 - a2)
}

// Time cubic is assumed monotone on [0, 1].
fn solve_bezier_time(x0: f64, x1: f64, x2: f64, x3: f64, time: f64) -> f64 {
    let span = x3 - x0;
    let tol = 1e-12 * span.abs().max(1.0);

    let mut u = ((time - x0) / span).clamp(0.0, 1.0);
    for _ in 0..8 {
        let err = bezier(x0, x1, x2, x3, u) - time;
        if err.abs() <= tol {
            return u;
        }
        let d = bezier_derivative(x0, x1, x2, x3, u);
        if d.abs() < 1e-12 {
            break;
        }
        u = (u - err / d).clamp(0.0, 1.0);
    }

    let mut lo = 0.0;
    let mut hi = 1.0;
    for _ in 0..60 {
        u = 0.5 * (lo + hi);
        let x = bezier(x0, x1, x2, x3, u);
        if (x - time).abs() <= tol {
            break;
        }
        if x < time {
            lo = u;
        } else {
            hi = u;
        }
    }
    u
}

impl AddAssign<Vec2> for Segment {
    fn add_assign(&mut self, delta: Vec2) {
        self.p0 += delta;
        self.t0 += delta;
        self.t1 += delta;
        self.p1 += delta;
    }
}

impl SubAssign<Vec2> for Segment {
    fn sub_assign(&mut self, delta: Vec2) {
        *self += -delta;
    }
}

/// Time-only shift.
impl AddAssign<f64> for Segment {
    fn add_assign(&mut self, dt: f64) {
        *self += Vec2::new(dt, 0.0);
    }
}

impl SubAssign<f64> for Segment {
    fn sub_assign(&mut self, dt: f64) {
        *self += Vec2::new(-dt, 0.0);
    }
}

impl<T> Add<T> for Segment
where
    Segment: AddAssign<T>,
{
    type Output = Segment;

    fn add(mut self, rhs: T) -> Segment {
        self += rhs;
        self
    }
}

impl<T> Sub<T> for Segment
where
    Segment: SubAssign<T>,
{
    type Output = Segment;

    fn sub(mut self, rhs: T) -> Segment {
        self -= rhs;
        self
    }
}

/// Mirror in time; `p0` keeps the earliest time.
impl Neg for Segment {
    type Output = Segment;

    fn neg(self) -> Segment {
        let flip = |p: Point| Point::new(-p.x, p.y);
        Segment {
            p0: flip(self.p1),
            t0: flip(self.t1),
            t1: flip(self.t0),
            p1: flip(self.p0),
            interp: self.interp,
        }
    }
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Segment{{{{{}, {}}}, {{{}, {}}}, {{{}, {}}}, {{{}, {}}}, {}}}",
            self.p0.x,
            self.p0.y,
            self.t0.x,
            self.t0.y,
            self.t1.x,
            self.t1.y,
            self.p1.x,
            self.p1.y,
            self.interp
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/spline/segment.rs"]
mod tests;
