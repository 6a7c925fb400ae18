/// Generation-tagged id of a network node.
///
/// The low 32 bits are the node's slot index, the high 32 bits the slot generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

/// Generation-tagged id of a node output, laid out like [`NodeId`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OutputId(u64);

macro_rules! tagged_id {
    ($t:ty) => {
        impl $t {
            pub fn new(index: u32, generation: u32) -> Self {
                Self((u64::from(generation) << 32) | u64::from(index))
            }

            pub fn from_raw(raw: u64) -> Self {
                Self(raw)
            }

            pub fn raw(self) -> u64 {
                self.0
            }

            pub fn index(self) -> usize {
                (self.0 & 0xffff_ffff) as usize
            }

            pub fn generation(self) -> u32 {
                (self.0 >> 32) as u32
            }
        }

        impl std::fmt::Display for $t {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}v{}", self.index(), self.generation())
            }
        }
    };
}

tagged_id!(NodeId);
tagged_id!(OutputId);

/// An output together with the node that owns it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Output {
    pub id: OutputId,
    pub node: NodeId,
}

impl Output {
    pub fn new(id: OutputId, node: NodeId) -> Self {
        Self { id, node }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/exec/ids.rs"]
mod tests;
