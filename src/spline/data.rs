use crate::foundation::core::Time;
use crate::foundation::error::{KeyloomError, KeyloomResult};
use crate::spline::extrapolation::Extrapolation;
use crate::spline::knot::{CurveType, Knot};
use crate::spline::loop_params::LoopParams;

/// Immutable snapshot of everything segment iteration reads.
///
/// `times` mirrors `knots[i].time` so iterators can binary-search a dense slice.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(from = "SplineDataDef")]
pub struct SplineData {
    #[serde(skip)]
    pub(crate) times: Vec<Time>,
    pub(crate) knots: Vec<Knot>,
    pub(crate) curve_type: CurveType,
    pub(crate) pre_extrapolation: Extrapolation,
    pub(crate) post_extrapolation: Extrapolation,
    pub(crate) loop_params: LoopParams,
}

#[derive(serde::Deserialize)]
struct SplineDataDef {
    #[serde(default)]
    knots: Vec<Knot>,
    #[serde(default)]
    curve_type: CurveType,
    #[serde(default)]
    pre_extrapolation: Extrapolation,
    #[serde(default)]
    post_extrapolation: Extrapolation,
    #[serde(default)]
    loop_params: LoopParams,
}

impl From<SplineDataDef> for SplineData {
    fn from(def: SplineDataDef) -> Self {
        let times = def.knots.iter().map(|k| k.time).collect();
        Self {
            times,
            knots: def.knots,
            curve_type: def.curve_type,
            pre_extrapolation: def.pre_extrapolation,
            post_extrapolation: def.post_extrapolation,
            loop_params: def.loop_params,
        }
    }
}

/// First and last knot time/value after expanding for inner loops.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KnotExtent {
    pub first_time: Time,
    pub first_pre_value: f64,
    pub first_value: f64,
    pub last_time: Time,
    pub last_pre_value: f64,
    pub last_value: f64,
}

impl KnotExtent {
    /// `last_time - first_time`.
    pub fn span(&self) -> Time {
        self.last_time - self.first_time
    }
}

impl SplineData {
    /// Build spline data from knots, sorting by time. Later duplicates replace earlier ones.
    pub fn from_knots(knots: impl IntoIterator<Item = Knot>) -> Self {
        let mut data = Self::default();
        data.set_knots(knots);
        data
    }

    pub fn with_curve_type(mut self, curve_type: CurveType) -> Self {
        self.curve_type = curve_type;
        self
    }

    pub fn with_pre_extrapolation(mut self, extrap: impl Into<Extrapolation>) -> Self {
        self.pre_extrapolation = extrap.into();
        self
    }

    pub fn with_post_extrapolation(mut self, extrap: impl Into<Extrapolation>) -> Self {
        self.post_extrapolation = extrap.into();
        self
    }

    pub fn with_loop_params(mut self, loop_params: LoopParams) -> Self {
        self.loop_params = loop_params;
        self
    }

    pub fn times(&self) -> &[Time] {
        &self.times
    }

    pub fn knots(&self) -> &[Knot] {
        &self.knots
    }

    pub fn curve_type(&self) -> CurveType {
        self.curve_type
    }

    pub fn pre_extrapolation(&self) -> Extrapolation {
        self.pre_extrapolation
    }

    pub fn post_extrapolation(&self) -> Extrapolation {
        self.post_extrapolation
    }

    pub fn loop_params(&self) -> LoopParams {
        self.loop_params
    }

    pub fn is_empty(&self) -> bool {
        self.knots.is_empty()
    }

    pub(crate) fn set_knots(&mut self, knots: impl IntoIterator<Item = Knot>) {
        let mut knots: Vec<Knot> = knots.into_iter().collect();
        knots.sort_by(|a, b| a.time.total_cmp(&b.time));
        // Stable sort keeps insertion order among equal times; keep the last one.
        let mut deduped: Vec<Knot> = Vec::with_capacity(knots.len());
        for k in knots {
            match deduped.last_mut() {
                Some(last) if last.time == k.time => *last = k,
                _ => deduped.push(k),
            }
        }
        self.times = deduped.iter().map(|k| k.time).collect();
        self.knots = deduped;
    }

    pub(crate) fn set_knot(&mut self, knot: Knot) {
        let idx = self.times.partition_point(|&t| t < knot.time);
        if self.times.get(idx) == Some(&knot.time) {
            self.knots[idx] = knot;
        } else {
            self.times.insert(idx, knot.time);
            self.knots.insert(idx, knot);
        }
    }

    pub(crate) fn remove_knot(&mut self, time: Time) -> Option<Knot> {
        let idx = self.times.partition_point(|&t| t < time);
        if self.times.get(idx) != Some(&time) {
            return None;
        }
        self.times.remove(idx);
        Some(self.knots.remove(idx))
    }

    /// Index of the first prototype knot when inner looping is active.
    ///
    /// Inner looping requires a positive prototype width, a non-zero loop count on at
    /// least one side, and a knot exactly at the prototype start.
    pub fn inner_loop_start(&self) -> Option<usize> {
        let lp = &self.loop_params;
        if lp.proto_end() <= lp.proto_start() {
            return None;
        }
        if lp.num_pre_loops() == 0 && lp.num_post_loops() == 0 {
            return None;
        }
        let idx = self.times.partition_point(|&t| t < lp.proto_start());
        (self.times.get(idx) == Some(&lp.proto_start())).then_some(idx)
    }

    pub fn has_inner_loops(&self) -> bool {
        self.inner_loop_start().is_some()
    }

    /// Knot-domain bounds including any inner-loop copies; `None` without knots.
    pub fn knot_extent(&self) -> Option<KnotExtent> {
        let first = self.knots.first()?;
        let last = self.knots.last()?;
        let mut ext = KnotExtent {
            first_time: first.time,
            first_pre_value: first.pre_value(),
            first_value: first.value,
            last_time: last.time,
            last_pre_value: last.pre_value(),
            last_value: last.value,
        };

        if let Some(proto_idx) = self.inner_loop_start() {
            let lp = &self.loop_params;
            let proto = &self.knots[proto_idx];
            let looped = lp.looped_interval();
            if looped.min <= ext.first_time {
                let dv = lp.value_offset() * f64::from(lp.num_pre_loops());
                ext.first_time = looped.min;
                ext.first_pre_value = proto.pre_value() - dv;
                ext.first_value = proto.value - dv;
            }
            if looped.max >= ext.last_time {
                let dv = lp.value_offset() * (f64::from(lp.num_post_loops()) + 1.0);
                ext.last_time = looped.max;
                ext.last_pre_value = proto.pre_value() + dv;
                ext.last_value = proto.value + dv;
            }
        }

        Some(ext)
    }

    /// Time where pre-extrapolation begins.
    pub fn pre_extrap_time(&self) -> Option<Time> {
        self.knot_extent().map(|e| e.first_time)
    }

    /// Time where post-extrapolation begins.
    pub fn post_extrap_time(&self) -> Option<Time> {
        self.knot_extent().map(|e| e.last_time)
    }

    /// Value approached by pre-extrapolation at [`Self::pre_extrap_time`].
    pub fn pre_extrap_value(&self) -> Option<f64> {
        self.knot_extent().map(|e| e.first_pre_value)
    }

    /// Value held by post-extrapolation at [`Self::post_extrap_time`].
    pub fn post_extrap_value(&self) -> Option<f64> {
        self.knot_extent().map(|e| e.last_value)
    }

    /// Check structural invariants: strictly increasing finite times, finite values,
    /// non-negative tangent widths, and well-formed loop parameters.
    pub fn validate(&self) -> KeyloomResult<()> {
        if self.times.len() != self.knots.len() {
            return Err(KeyloomError::spline("knot time table is out of sync"));
        }
        for (i, k) in self.knots.iter().enumerate() {
            if self.times[i] != k.time {
                return Err(KeyloomError::spline("knot time table is out of sync"));
            }
            if !k.time.is_finite() {
                return Err(KeyloomError::spline(format!("knot {i} has non-finite time")));
            }
            if !k.value.is_finite() || !k.pre_value().is_finite() {
                return Err(KeyloomError::spline(format!(
                    "knot at t={} has non-finite value",
                    k.time
                )));
            }
            let widths = [k.pre_tan_width, k.post_tan_width];
            if widths.iter().any(|w| !w.is_finite() || *w < 0.0) {
                return Err(KeyloomError::spline(format!(
                    "knot at t={} has negative or non-finite tangent width",
                    k.time
                )));
            }
            if !k.pre_tan_slope.is_finite() || !k.post_tan_slope.is_finite() {
                return Err(KeyloomError::spline(format!(
                    "knot at t={} has non-finite tangent slope",
                    k.time
                )));
            }
            if i > 0 && self.times[i - 1] >= k.time {
                return Err(KeyloomError::spline(format!(
                    "knot times must be strictly increasing (t={} follows t={})",
                    k.time,
                    self.times[i - 1]
                )));
            }
        }

        let lp = &self.loop_params;
        if !lp.proto_start().is_finite() || !lp.proto_end().is_finite() {
            return Err(KeyloomError::spline("loop prototype bounds must be finite"));
        }
        if lp.proto_end() < lp.proto_start() {
            return Err(KeyloomError::spline(format!(
                "loop prototype end {} precedes start {}",
                lp.proto_end(),
                lp.proto_start()
            )));
        }
        if !lp.value_offset().is_finite() {
            return Err(KeyloomError::spline("loop value offset must be finite"));
        }
        for (side, ex) in [
            ("pre", &self.pre_extrapolation),
            ("post", &self.post_extrapolation),
        ] {
            if !ex.slope.is_finite() {
                return Err(KeyloomError::spline(format!(
                    "{side}-extrapolation slope must be finite"
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/spline/data.rs"]
mod tests;
