//! Lofted-output bookkeeping and the minimal network and executor that drive it.

pub(crate) mod executor;
pub(crate) mod ids;
pub(crate) mod lofted;
pub(crate) mod mask;
pub(crate) mod network;
pub(crate) mod sharded;
