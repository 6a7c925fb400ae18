pub use kurbo::{Point, Vec2};

/// Spline time coordinate.
pub type Time = f64;

/// Interval over spline time with independently open or closed bounds.
///
/// Bounds may be infinite. An interval is empty when `min > max`, or when `min == max`
/// and either bound is open.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimeInterval {
    /// Lower bound.
    pub min: Time,
    /// Upper bound.
    pub max: Time,
    /// Whether `min` itself belongs to the interval.
    pub min_closed: bool,
    /// Whether `max` itself belongs to the interval.
    pub max_closed: bool,
}

impl Default for TimeInterval {
    fn default() -> Self {
        Self::empty()
    }
}

impl TimeInterval {
    /// Build an interval with explicit bound closure.
    pub fn new(min: Time, max: Time, min_closed: bool, max_closed: bool) -> Self {
        Self {
            min,
            max,
            min_closed,
            max_closed,
        }
    }

    /// Closed interval `[min, max]`.
    pub fn closed(min: Time, max: Time) -> Self {
        Self::new(min, max, true, true)
    }

    /// Half-open interval `[min, max)`.
    pub fn closed_open(min: Time, max: Time) -> Self {
        Self::new(min, max, true, false)
    }

    /// Degenerate closed interval `[t, t]`.
    pub fn point(t: Time) -> Self {
        Self::closed(t, t)
    }

    /// The empty interval.
    pub fn empty() -> Self {
        Self::new(0.0, 0.0, false, false)
    }

    /// `(-inf, +inf)`.
    pub fn everything() -> Self {
        Self::new(f64::NEG_INFINITY, f64::INFINITY, false, false)
    }

    /// Return `true` when no time value lies inside the interval.
    pub fn is_empty(&self) -> bool {
        self.min > self.max || (self.min == self.max && !(self.min_closed && self.max_closed))
    }

    /// Return `true` when `t` lies inside the interval.
    pub fn contains(&self, t: Time) -> bool {
        let above_min = self.min < t || (self.min == t && self.min_closed);
        let below_max = t < self.max || (t == self.max && self.max_closed);
        above_min && below_max
    }

    /// Intersection of two intervals.
    ///
    /// When both bounds coincide, the result bound is closed only if both inputs are closed.
    pub fn intersect(&self, other: &Self) -> Self {
        if self.is_empty() || other.is_empty() {
            return Self::empty();
        }

        let (min, min_closed) = if self.min > other.min {
            (self.min, self.min_closed)
        } else if other.min > self.min {
            (other.min, other.min_closed)
        } else {
            (self.min, self.min_closed && other.min_closed)
        };

        let (max, max_closed) = if self.max < other.max {
            (self.max, self.max_closed)
        } else if other.max < self.max {
            (other.max, other.max_closed)
        } else {
            (self.max, self.max_closed && other.max_closed)
        };

        Self::new(min, max, min_closed, max_closed)
    }

    /// Return `true` when the intervals share at least one time value.
    pub fn intersects(&self, other: &Self) -> bool {
        !self.intersect(other).is_empty()
    }

    /// Translate both bounds by `delta`, keeping bound closure.
    pub fn shift(&self, delta: Time) -> Self {
        Self::new(
            self.min + delta,
            self.max + delta,
            self.min_closed,
            self.max_closed,
        )
    }

    /// Copy of this interval with the upper bound opened.
    pub fn with_max_open(&self) -> Self {
        Self::new(self.min, self.max, self.min_closed, false)
    }

    /// Return `true` when the lower bound is finite.
    pub fn is_min_finite(&self) -> bool {
        self.min.is_finite()
    }

    /// Return `true` when the upper bound is finite.
    pub fn is_max_finite(&self) -> bool {
        self.max.is_finite()
    }

    /// Length of the interval (`max - min`), zero for empty intervals.
    pub fn size(&self) -> Time {
        if self.is_empty() {
            0.0
        } else {
            self.max - self.min
        }
    }
}

impl std::ops::BitAnd for TimeInterval {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        self.intersect(&rhs)
    }
}

impl std::ops::BitAndAssign for TimeInterval {
    fn bitand_assign(&mut self, rhs: Self) {
        *self = self.intersect(&rhs);
    }
}

impl std::fmt::Display for TimeInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{}, {}{}",
            if self.min_closed { '[' } else { '(' },
            self.min,
            self.max,
            if self.max_closed { ']' } else { ')' },
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
