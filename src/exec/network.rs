use crate::exec::ids::{NodeId, Output, OutputId};
use crate::foundation::error::{KeyloomError, KeyloomResult};

/// A network node and the outputs it owns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    id: NodeId,
    outputs: Vec<Output>,
}

impl Node {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn outputs(&self) -> &[Output] {
        &self.outputs
    }

    pub fn output(&self, i: usize) -> Option<Output> {
        self.outputs.get(i).copied()
    }
}

#[derive(Clone, Debug, Default)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Minimal node graph: a generation-tagged slot allocator.
///
/// Freed slots are reused with a bumped generation, so stale ids never resolve. Output ids
/// are never reused.
#[derive(Clone, Debug, Default)]
pub struct Network {
    slots: Vec<Slot>,
    free: Vec<u32>,
    next_output: u32,
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails without touching the network when the output or slot ids would leave the
    /// 32-bit index space.
    pub fn add_node(&mut self, num_outputs: usize) -> KeyloomResult<NodeId> {
        let first = self.next_output;
        let end = u32::try_from(num_outputs)
            .ok()
            .and_then(|n| first.checked_add(n))
            .ok_or_else(|| {
                KeyloomError::validation(format!(
                    "node with {num_outputs} outputs exceeds the output id space"
                ))
            })?;
        let index = match self.free.pop() {
            Some(i) => i,
            None => {
                let i = u32::try_from(self.slots.len()).map_err(|_| {
                    KeyloomError::validation("network node slots exhausted")
                })?;
                self.slots.push(Slot::default());
                i
            }
        };
        let id = NodeId::new(index, self.slots[index as usize].generation);
        self.next_output = end;
        let outputs = (first..end)
            .map(|o| Output::new(OutputId::new(o, 0), id))
            .collect();
        self.slots[index as usize].node = Some(Node { id, outputs });
        tracing::debug!(node = %id, num_outputs, "added node");
        Ok(id)
    }

    pub fn remove_node(&mut self, id: NodeId) -> Option<Node> {
        let slot = self.slots.get_mut(id.index())?;
        if slot.generation != id.generation() {
            return None;
        }
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index() as u32);
        Some(node)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        let slot = self.slots.get(id.index())?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.node.as_ref()
    }

    /// One past the highest slot index ever allocated.
    pub fn node_capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn node_count(&self) -> usize {
        self.slots.iter().filter(|s| s.node.is_some()).count()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.slots.iter().filter_map(|s| s.node.as_ref())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/exec/network.rs"]
mod tests;
