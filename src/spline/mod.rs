pub(crate) mod data;
pub(crate) mod extrapolation;
pub mod iter;
pub(crate) mod knot;
pub(crate) mod loop_params;
pub(crate) mod segment;
#[allow(clippy::module_inception)]
pub(crate) mod spline;
