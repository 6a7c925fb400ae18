use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::atomic::{AtomicU32, Ordering};

use rayon::prelude::*;

use crate::exec::ids::{NodeId, Output, OutputId};
use crate::exec::mask::Mask;
use crate::exec::network::Node;
use crate::exec::sharded::ShardedMap;
use crate::foundation::error::{KeyloomError, KeyloomResult};

/// Tuning for a [`LoftedOutputSet`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoftedSetOpts {
    /// Lock-stripe count. Rounded up to a power of two.
    pub shards: usize,
    /// Dependency maps with fewer entries than this are scanned on the calling thread.
    pub parallel_threshold: usize,
    /// Worker count for bulk passes. `None` uses the global rayon pool.
    pub threads: Option<usize>,
}

impl Default for LoftedSetOpts {
    fn default() -> Self {
        Self {
            shards: 64,
            parallel_threshold: 1024,
            threads: None,
        }
    }
}

impl LoftedSetOpts {
    pub fn validate(&self) -> KeyloomResult<()> {
        if self.shards == 0 {
            return Err(KeyloomError::validation("lofted set 'shards' must be >= 1"));
        }
        if self.threads == Some(0) {
            return Err(KeyloomError::validation(
                "lofted set 'threads' must be >= 1 when set",
            ));
        }
        Ok(())
    }
}

/// An output paired with the elements of it that matter to a request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MaskedOutput {
    pub output: Output,
    pub mask: Mask,
}

/// Tracks which outputs currently hold values sourced from a page cache.
///
/// `add`, `remove` and the lookups are safe to call from many evaluation threads at once.
/// `resize`, `clear` and `remove_all_outputs_for_node` take `&mut self`, so the borrow
/// checker enforces that they run between evaluation passes.
///
/// The per-node reference counts use relaxed atomics. They only provide a fast "nothing
/// lofted on this node" rejection; the map is authoritative.
pub struct LoftedOutputSet {
    outputs: ShardedMap<Output, Mask>,
    node_refs: Vec<AtomicU32>,
    parallel_threshold: usize,
    pool: Option<rayon::ThreadPool>,
}

impl Default for LoftedOutputSet {
    fn default() -> Self {
        let opts = LoftedSetOpts::default();
        Self {
            outputs: ShardedMap::new(opts.shards),
            node_refs: Vec::new(),
            parallel_threshold: opts.parallel_threshold,
            pool: None,
        }
    }
}

impl std::fmt::Debug for LoftedOutputSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoftedOutputSet")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .field("shards", &self.outputs.shard_count())
            .finish()
    }
}

impl LoftedOutputSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_opts(opts: LoftedSetOpts) -> KeyloomResult<Self> {
        opts.validate()?;
        let pool = opts.threads.map(build_thread_pool).transpose()?;
        Ok(Self {
            outputs: ShardedMap::new(opts.shards),
            node_refs: Vec::new(),
            parallel_threshold: opts.parallel_threshold,
            pool,
        })
    }

    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of node slots that `add` accepts.
    pub fn capacity(&self) -> usize {
        self.node_refs.len()
    }

    /// Grow the node capacity. Never shrinks and keeps existing counts.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn resize(&mut self, capacity: usize) {
        if capacity > self.node_refs.len() {
            self.node_refs.resize_with(capacity, || AtomicU32::new(0));
        }
    }

    /// Mark `output` as lofted for the elements in `mask`.
    ///
    /// Repeated adds union their masks. Returns `false` when the owning node lies beyond
    /// the current capacity; callers must `resize` first.
    pub fn add(&self, output: Output, mask: &Mask) -> bool {
        let Some(refs) = self.node_refs.get(output.node.index()) else {
            return false;
        };
        self.outputs
            .with_shard_mut(&output, |map| match map.entry(output) {
                Entry::Occupied(mut e) => e.get_mut().set_or_append(mask),
                Entry::Vacant(e) => {
                    e.insert(mask.clone());
                    refs.fetch_add(1, Ordering::Relaxed);
                }
            });
        true
    }

    /// Drop the elements in `mask` from an output. An empty `mask` drops the whole entry.
    pub fn remove(&self, output_id: OutputId, node_id: NodeId, mask: &Mask) {
        if self.is_empty() || self.node_ref_count(node_id) == 0 {
            return;
        }
        let Some(refs) = self.node_refs.get(node_id.index()) else {
            return;
        };
        let key = Output::new(output_id, node_id);
        self.outputs.with_shard_mut(&key, |map| {
            let Entry::Occupied(mut e) = map.entry(key) else {
                return;
            };
            let erase = if mask.is_empty() || e.get() == mask {
                true
            } else {
                *e.get_mut() -= mask;
                e.get().is_all_zeros()
            };
            if erase {
                e.remove();
                refs.fetch_sub(1, Ordering::Relaxed);
            }
        });
    }

    #[tracing::instrument(level = "debug", skip(self, node), fields(node = %node.id()))]
    pub fn remove_all_outputs_for_node(&mut self, node: &Node) {
        let Some(refs) = self.node_refs.get_mut(node.id().index()) else {
            return;
        };
        if *refs.get_mut() == 0 {
            return;
        }
        *refs.get_mut() = 0;
        for output in node.outputs() {
            self.outputs.remove(output);
        }
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub fn clear(&mut self) {
        self.outputs.clear();
        let refs = &mut self.node_refs;
        install(self.pool.as_ref(), || {
            refs.par_iter_mut().for_each(|r| *r.get_mut() = 0);
        });
    }

    pub fn contains(&self, output: &Output) -> bool {
        self.outputs.read(output, |m| m.is_some())
    }

    pub fn mask_of(&self, output: &Output) -> Option<Mask> {
        self.outputs.read(output, |m| m.cloned())
    }

    pub fn node_ref_count(&self, node: NodeId) -> u32 {
        self.node_refs
            .get(node.index())
            .map_or(0, |r| r.load(Ordering::Relaxed))
    }

    /// Entries of `deps` whose output is lofted, each masked by what is lofted.
    ///
    /// The result is pre-sized to `min(self.len(), deps.len())`, which bounds it unless
    /// adds race with the scan.
    #[tracing::instrument(level = "debug", skip(self, deps), fields(deps = deps.len()))]
    pub fn collect_lofted_dependencies(&self, deps: &HashMap<Output, Mask>) -> Vec<MaskedOutput> {
        let cap = self.len().min(deps.len());
        let mut out = Vec::with_capacity(cap);
        if cap == 0 {
            return out;
        }
        if deps.len() < self.parallel_threshold {
            out.extend(deps.iter().filter_map(|(o, m)| self.probe(o, m)));
        } else {
            install(self.pool.as_ref(), || {
                out.par_extend(deps.par_iter().filter_map(|(o, m)| self.probe(o, m)));
            });
        }
        tracing::debug!(lofted = out.len(), "collected lofted dependencies");
        out
    }

    fn probe(&self, output: &Output, dep_mask: &Mask) -> Option<MaskedOutput> {
        if self.node_ref_count(output.node) == 0 {
            return None;
        }
        self.outputs.read(output, |stored| {
            stored.map(|stored| MaskedOutput {
                output: *output,
                mask: dep_mask & stored,
            })
        })
    }
}

fn install<R: Send>(pool: Option<&rayon::ThreadPool>, f: impl FnOnce() -> R + Send) -> R {
    match pool {
        Some(pool) => pool.install(f),
        None => f(),
    }
}

fn build_thread_pool(threads: usize) -> KeyloomResult<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| KeyloomError::evaluation(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/exec/lofted.rs"]
mod tests;
