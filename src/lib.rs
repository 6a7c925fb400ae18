//! Keyloom is a spline segment-iteration engine with concurrent cache bookkeeping.
//!
//! The spline side turns knots, inner loops and extrapolation into a lazy, time-ordered
//! sequence of [`Segment`]s:
//!
//! - Build a [`Spline`] (or load one with [`Spline::from_json_str`])
//! - Walk it with [`Spline::segments`] or evaluate it with [`Spline::eval`]
//!
//! The execution side tracks which outputs hold values served from a secondary cache
//! ([`LoftedOutputSet`]), driven by a minimal [`Network`] and [`PageCacheExecutor`].
#![forbid(unsafe_code)]

mod exec;
mod foundation;

/// Spline data model and segment iterators.
pub mod spline;

pub use crate::foundation::core::{Point, Time, TimeInterval, Vec2};
pub use crate::foundation::error::{KeyloomError, KeyloomResult};
pub use crate::foundation::math::is_close;

pub use crate::spline::data::{KnotExtent, SplineData};
pub use crate::spline::extrapolation::{ExtrapMode, Extrapolation};
pub use crate::spline::iter::{
    KnotSection, KnotSegmentIterator, LoopSegmentIterator, PrototypeSegmentIterator,
    SegmentIterator, SplineRegion,
};
pub use crate::spline::knot::{CurveType, InterpMode, Knot};
pub use crate::spline::loop_params::LoopParams;
pub use crate::spline::segment::{Segment, SegmentInterp};
pub use crate::spline::spline::Spline;

pub use crate::exec::executor::{PageCacheExecutor, PageKey};
pub use crate::exec::ids::{NodeId, Output, OutputId};
pub use crate::exec::lofted::{LoftedOutputSet, LoftedSetOpts, MaskedOutput};
pub use crate::exec::mask::Mask;
pub use crate::exec::network::{Network, Node};
