/// Policy for spline values outside the knot-defined region.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtrapMode {
    /// No value outside the knots.
    ValueBlock,
    /// Hold the boundary knot value.
    #[default]
    Held,
    /// Continue with the slope of the adjacent segment.
    Linear,
    /// Continue with an explicit slope.
    Sloped,
    /// Repeat the knot span, offsetting each repeat by the span's value change.
    LoopRepeat,
    /// Repeat the knot span without value offset.
    LoopReset,
    /// Alternate forward and time-mirrored copies of the knot span.
    LoopOscillate,
}

/// Extrapolation descriptor for one side of a spline.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Extrapolation {
    /// Extrapolation mode.
    pub mode: ExtrapMode,
    /// Slope used only by [`ExtrapMode::Sloped`].
    #[serde(default)]
    pub slope: f64,
}

impl Extrapolation {
    /// Extrapolation with the given mode and zero slope.
    pub fn new(mode: ExtrapMode) -> Self {
        Self { mode, slope: 0.0 }
    }

    /// [`ExtrapMode::Sloped`] extrapolation with `slope`.
    pub fn sloped(slope: f64) -> Self {
        Self {
            mode: ExtrapMode::Sloped,
            slope,
        }
    }

    /// Return `true` for the three looping modes.
    pub fn is_looping(&self) -> bool {
        matches!(
            self.mode,
            ExtrapMode::LoopRepeat | ExtrapMode::LoopReset | ExtrapMode::LoopOscillate
        )
    }
}

impl From<ExtrapMode> for Extrapolation {
    fn from(mode: ExtrapMode) -> Self {
        Self::new(mode)
    }
}
