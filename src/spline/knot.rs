use crate::foundation::core::Time;

/// Interpolation mode authored on a knot for the segment that follows it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterpMode {
    /// The segment has no value.
    ValueBlock,
    /// Hold the knot value until the next knot.
    Held,
    /// Straight line to the next knot.
    Linear,
    /// Curve whose shape depends on the spline's [`CurveType`].
    #[default]
    Curve,
}

/// Curve flavor shared by every curved segment of a spline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveType {
    /// Cubic Bezier through tangent endpoints.
    #[default]
    Bezier,
    /// Cubic Hermite driven by tangent slopes.
    Hermite,
}

/// One authored control point.
///
/// Tangents are stored as width/slope pairs. A knot is dual-valued when `pre_value` is set,
/// in which case the spline approaches `pre_value` from the left and leaves from `value`.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Knot {
    /// Knot time.
    pub time: Time,
    /// Value at and after `time`.
    pub value: f64,
    /// Value just before `time`, when the knot is dual-valued.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_value: Option<f64>,
    /// Width of the incoming tangent.
    #[serde(default)]
    pub pre_tan_width: f64,
    /// Slope of the incoming tangent.
    #[serde(default)]
    pub pre_tan_slope: f64,
    /// Width of the outgoing tangent.
    #[serde(default)]
    pub post_tan_width: f64,
    /// Slope of the outgoing tangent.
    #[serde(default)]
    pub post_tan_slope: f64,
    /// Interpolation toward the next knot.
    #[serde(default)]
    pub next_interp: InterpMode,
}

impl Knot {
    /// Knot at `(time, value)` with flat zero-width tangents.
    pub fn new(time: Time, value: f64, next_interp: InterpMode) -> Self {
        Self {
            time,
            value,
            next_interp,
            ..Self::default()
        }
    }

    /// Knot with explicit tangents.
    pub fn with_tangents(
        time: Time,
        value: f64,
        pre_tan: (f64, f64),
        post_tan: (f64, f64),
        next_interp: InterpMode,
    ) -> Self {
        Self {
            time,
            value,
            pre_value: None,
            pre_tan_width: pre_tan.0,
            pre_tan_slope: pre_tan.1,
            post_tan_width: post_tan.0,
            post_tan_slope: post_tan.1,
            next_interp,
        }
    }

    /// Make this knot dual-valued.
    pub fn with_pre_value(mut self, pre_value: f64) -> Self {
        self.pre_value = Some(pre_value);
        self
    }

    /// Return `true` when the knot has a distinct pre-value.
    pub fn is_dual_valued(&self) -> bool {
        self.pre_value.is_some()
    }

    /// Value approached from the left.
    pub fn pre_value(&self) -> f64 {
        self.pre_value.unwrap_or(self.value)
    }

    /// Vertical extent of the incoming tangent, measured backwards from the knot.
    pub fn pre_tan_height(&self) -> f64 {
        -self.pre_tan_width * self.pre_tan_slope
    }

    /// Vertical extent of the outgoing tangent.
    pub fn post_tan_height(&self) -> f64 {
        self.post_tan_width * self.post_tan_slope
    }

    /// Copy translated by `dt` in time and `dv` in value (both sides of a dual value).
    pub fn shifted(&self, dt: Time, dv: f64) -> Self {
        Self {
            time: self.time + dt,
            value: self.value + dv,
            pre_value: self.pre_value.map(|v| v + dv),
            ..*self
        }
    }
}
