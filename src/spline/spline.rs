use std::sync::Arc;

use crate::foundation::core::{Time, TimeInterval};
use crate::foundation::error::KeyloomResult;
use crate::spline::data::SplineData;
use crate::spline::extrapolation::Extrapolation;
use crate::spline::iter::SegmentIterator;
use crate::spline::knot::{CurveType, Knot};
use crate::spline::loop_params::LoopParams;

/// Shared, copy-on-write spline handle.
///
/// Clones share one [`SplineData`] snapshot. Setters detach the snapshot first when it is
/// shared, so iterators borrowing an older clone keep seeing the data they started with.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Spline {
    data: Arc<SplineData>,
}

impl Spline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap validated spline data.
    pub fn from_data(data: SplineData) -> KeyloomResult<Self> {
        data.validate()?;
        Ok(Self {
            data: Arc::new(data),
        })
    }

    /// Parse a spline from its JSON form and validate it.
    pub fn from_json_str(s: &str) -> KeyloomResult<Self> {
        let data: SplineData = serde_json::from_str(s)?;
        Self::from_data(data)
    }

    pub fn to_json_string(&self) -> KeyloomResult<String> {
        Ok(serde_json::to_string_pretty(self.data.as_ref())?)
    }

    /// Read-only snapshot that iterators borrow.
    pub fn data(&self) -> &SplineData {
        &self.data
    }

    pub fn knots(&self) -> &[Knot] {
        self.data.knots()
    }

    /// Return `true` when both handles share one snapshot.
    pub fn shares_data_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    /// Replace every knot. Knots are sorted by time; a later duplicate time wins.
    pub fn set_knots(&mut self, knots: impl IntoIterator<Item = Knot>) {
        Arc::make_mut(&mut self.data).set_knots(knots);
    }

    /// Insert a knot, replacing any knot at the same time.
    pub fn set_knot(&mut self, knot: Knot) {
        Arc::make_mut(&mut self.data).set_knot(knot);
    }

    pub fn remove_knot(&mut self, time: Time) -> Option<Knot> {
        Arc::make_mut(&mut self.data).remove_knot(time)
    }

    pub fn set_curve_type(&mut self, curve_type: CurveType) {
        Arc::make_mut(&mut self.data).curve_type = curve_type;
    }

    pub fn set_pre_extrapolation(&mut self, extrap: impl Into<Extrapolation>) {
        Arc::make_mut(&mut self.data).pre_extrapolation = extrap.into();
    }

    pub fn set_post_extrapolation(&mut self, extrap: impl Into<Extrapolation>) {
        Arc::make_mut(&mut self.data).post_extrapolation = extrap.into();
    }

    pub fn set_inner_loop_params(&mut self, loop_params: LoopParams) {
        Arc::make_mut(&mut self.data).loop_params = loop_params;
    }

    /// Segments covering `interval`, in time order.
    pub fn segments(&self, interval: TimeInterval) -> SegmentIterator<'_> {
        SegmentIterator::new(&self.data, interval)
    }

    /// Value at `time`, honoring inner loops and every extrapolation mode.
    ///
    /// `None` for an empty spline or a value-blocked region.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn eval(&self, time: Time) -> Option<f64> {
        // A one-ulp half-open window lands in a single segment even on the seam of a
        // mirrored oscillation copy, where a degenerate point interval would mirror to empty.
        let window = TimeInterval::closed_open(time, time.next_up());
        let seg = self
            .segments(window)
            .next()
            .or_else(|| self.segments(TimeInterval::point(time)).next())?;
        seg.eval(time)
    }
}

impl serde::Serialize for Spline {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.data.as_ref().serialize(serializer)
    }
}

impl<'de> serde::Deserialize<'de> for Spline {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let data = SplineData::deserialize(deserializer)?;
        data.validate().map_err(serde::de::Error::custom)?;
        Ok(Self {
            data: Arc::new(data),
        })
    }
}

impl From<SplineData> for Spline {
    /// Wrap spline data without validation.
    fn from(data: SplineData) -> Self {
        Self {
            data: Arc::new(data),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/spline/spline.rs"]
mod tests;
