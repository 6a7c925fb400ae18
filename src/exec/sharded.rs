use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::RwLock;

use crate::exec::ids::Output;
use crate::foundation::math::stable_hash_u64;

/// Keys that can pick a lock stripe from a stable integer.
pub(crate) trait ShardKey: Hash + Eq {
    fn shard_bits(&self) -> u64;
}

impl ShardKey for Output {
    fn shard_bits(&self) -> u64 {
        self.id.raw()
    }
}

/// Lock-striped hash map.
///
/// Each key lives in exactly one stripe, so operations on keys in different stripes never
/// contend. The element count is kept in an atomic outside the stripes.
pub(crate) struct ShardedMap<K, V> {
    shards: Box<[RwLock<HashMap<K, V>>]>,
    mask: usize,
    len: AtomicUsize,
}

impl<K: ShardKey, V> ShardedMap<K, V> {
    /// `shards` is rounded up to a power of two and is at least 1.
    pub(crate) fn new(shards: usize) -> Self {
        let n = shards.max(1).next_power_of_two();
        Self {
            shards: (0..n).map(|_| RwLock::new(HashMap::new())).collect(),
            mask: n - 1,
            len: AtomicUsize::new(0),
        }
    }

    fn shard(&self, key: &K) -> &RwLock<HashMap<K, V>> {
        &self.shards[(stable_hash_u64(key.shard_bits()) as usize) & self.mask]
    }

    pub(crate) fn shard_count(&self) -> usize {
        self.shards.len()
    }

    pub(crate) fn len(&self) -> usize {
        self.len.load(Ordering::Relaxed)
    }

    /// Run `f` on the stripe holding `key` under its write lock.
    pub(crate) fn with_shard_mut<R>(&self, key: &K, f: impl FnOnce(&mut HashMap<K, V>) -> R) -> R {
        let mut guard = self.shard(key).write();
        let before = guard.len();
        let r = f(&mut guard);
        let after = guard.len();
        if after > before {
            self.len.fetch_add(after - before, Ordering::Relaxed);
        } else if before > after {
            self.len.fetch_sub(before - after, Ordering::Relaxed);
        }
        r
    }

    /// Run `f` on the value stored for `key` under the stripe's read lock.
    pub(crate) fn read<R>(&self, key: &K, f: impl FnOnce(Option<&V>) -> R) -> R {
        f(self.shard(key).read().get(key))
    }

    pub(crate) fn remove(&self, key: &K) -> Option<V> {
        self.with_shard_mut(key, |m| m.remove(key))
    }

    pub(crate) fn clear(&mut self) {
        for shard in self.shards.iter_mut() {
            shard.get_mut().clear();
        }
        *self.len.get_mut() = 0;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/exec/sharded.rs"]
mod tests;
