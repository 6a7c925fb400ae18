use crate::foundation::core::{Time, TimeInterval};

/// Inner-loop parameters: a prototype knot range replicated before and after itself.
///
/// Loop counts are never negative; negative inputs are clamped to zero on construction,
/// on assignment, and on deserialization.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(from = "LoopParamsDef")]
pub struct LoopParams {
    proto_start: Time,
    proto_end: Time,
    num_pre_loops: i32,
    num_post_loops: i32,
    value_offset: f64,
}

#[derive(serde::Deserialize)]
struct LoopParamsDef {
    proto_start: Time,
    proto_end: Time,
    #[serde(default)]
    num_pre_loops: i32,
    #[serde(default)]
    num_post_loops: i32,
    #[serde(default)]
    value_offset: f64,
}

impl From<LoopParamsDef> for LoopParams {
    fn from(def: LoopParamsDef) -> Self {
        Self::new(
            def.proto_start,
            def.proto_end,
            def.num_pre_loops,
            def.num_post_loops,
            def.value_offset,
        )
    }
}

impl LoopParams {
    /// Build loop parameters, clamping negative loop counts to zero.
    pub fn new(
        proto_start: Time,
        proto_end: Time,
        num_pre_loops: i32,
        num_post_loops: i32,
        value_offset: f64,
    ) -> Self {
        Self {
            proto_start,
            proto_end,
            num_pre_loops: num_pre_loops.max(0),
            num_post_loops: num_post_loops.max(0),
            value_offset,
        }
    }

    pub fn proto_start(&self) -> Time {
        self.proto_start
    }

    pub fn proto_end(&self) -> Time {
        self.proto_end
    }

    pub fn num_pre_loops(&self) -> i32 {
        self.num_pre_loops
    }

    pub fn num_post_loops(&self) -> i32 {
        self.num_post_loops
    }

    pub fn value_offset(&self) -> f64 {
        self.value_offset
    }

    pub fn set_proto_start(&mut self, t: Time) {
        self.proto_start = t;
    }

    pub fn set_proto_end(&mut self, t: Time) {
        self.proto_end = t;
    }

    pub fn set_num_pre_loops(&mut self, n: i32) {
        self.num_pre_loops = n.max(0);
    }

    pub fn set_num_post_loops(&mut self, n: i32) {
        self.num_post_loops = n.max(0);
    }

    pub fn set_value_offset(&mut self, offset: f64) {
        self.value_offset = offset;
    }

    /// `protoEnd - protoStart`.
    pub fn proto_span(&self) -> Time {
        self.proto_end - self.proto_start
    }

    /// Half-open `[protoStart, protoEnd)`.
    pub fn prototype_interval(&self) -> TimeInterval {
        TimeInterval::closed_open(self.proto_start, self.proto_end)
    }

    /// Closed interval covering the prototype and all of its copies.
    pub fn looped_interval(&self) -> TimeInterval {
        let span = self.proto_span();
        TimeInterval::closed(
            self.proto_start - f64::from(self.num_pre_loops) * span,
            self.proto_end + f64::from(self.num_post_loops) * span,
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/spline/loop_params.rs"]
mod tests;
