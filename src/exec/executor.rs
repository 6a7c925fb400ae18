use std::collections::HashMap;

use parking_lot::RwLock;

use crate::exec::ids::Output;
use crate::exec::lofted::{LoftedOutputSet, LoftedSetOpts, MaskedOutput};
use crate::exec::mask::Mask;
use crate::exec::network::{Network, Node};
use crate::foundation::error::KeyloomResult;

/// Values that can select a page of the secondary cache.
pub trait PageKey {
    /// Page selected by this value, or `None` when it selects no page.
    fn page_key(&self) -> Option<u64>;
}

impl PageKey for f64 {
    fn page_key(&self) -> Option<u64> {
        // Fold -0.0 onto 0.0 so both select one page.
        (!self.is_nan()).then(|| (self + 0.0).to_bits())
    }
}

impl PageKey for u64 {
    fn page_key(&self) -> Option<u64> {
        Some(*self)
    }
}

impl PageKey for i64 {
    fn page_key(&self) -> Option<u64> {
        Some(*self as u64)
    }
}

/// Executor with a local data store backed by a paged secondary cache.
///
/// The cache page in use is chosen by the local value of a key output at the start of each
/// evaluation pass. A local miss that hits the page is served from the cache and recorded
/// in the lofted set, so later invalidation reaches it.
pub struct PageCacheExecutor<V> {
    key_output: Output,
    local: RwLock<HashMap<Output, V>>,
    pages: RwLock<HashMap<u64, HashMap<Output, V>>>,
    current_page: Option<u64>,
    lofted: LoftedOutputSet,
}

impl<V> std::fmt::Debug for PageCacheExecutor<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageCacheExecutor")
            .field("key_output", &self.key_output)
            .field("current_page", &self.current_page)
            .field("lofted", &self.lofted)
            .finish_non_exhaustive()
    }
}

impl<V: PageKey + Clone + Send + Sync> PageCacheExecutor<V> {
    pub fn new(key_output: Output) -> Self {
        Self::from_lofted(key_output, LoftedOutputSet::new())
    }

    pub fn with_opts(key_output: Output, opts: LoftedSetOpts) -> KeyloomResult<Self> {
        Ok(Self::from_lofted(key_output, LoftedOutputSet::with_opts(opts)?))
    }

    fn from_lofted(key_output: Output, lofted: LoftedOutputSet) -> Self {
        Self {
            key_output,
            local: RwLock::new(HashMap::new()),
            pages: RwLock::new(HashMap::new()),
            current_page: None,
            lofted,
        }
    }

    pub fn key_output(&self) -> Output {
        self.key_output
    }

    pub fn current_page(&self) -> Option<u64> {
        self.current_page
    }

    pub fn lofted(&self) -> &LoftedOutputSet {
        &self.lofted
    }

    /// Size the lofted set for `network` and select the cache page.
    ///
    /// Switching pages drops every lofted entry, since those values came from the old page.
    #[tracing::instrument(level = "debug", skip(self, network))]
    pub fn begin_evaluation(&mut self, network: &Network) {
        self.lofted.resize(network.node_capacity());
        let page = self
            .local
            .get_mut()
            .get(&self.key_output)
            .and_then(PageKey::page_key);
        if page != self.current_page {
            tracing::debug!(?page, previous = ?self.current_page, "switching cache page");
            self.lofted.clear();
            self.current_page = page;
        }
    }

    /// Store a computed value locally.
    pub fn set_output_value(&self, output: Output, value: V) {
        self.local.write().insert(output, value);
    }

    /// Publish a locally computed value into the current cache page.
    ///
    /// Returns `false` when no page is selected or the output has no local value.
    pub fn cache_output(&self, output: Output) -> bool {
        let Some(page) = self.current_page else {
            return false;
        };
        let Some(value) = self.local.read().get(&output).cloned() else {
            return false;
        };
        self.pages
            .write()
            .entry(page)
            .or_default()
            .insert(output, value);
        true
    }

    /// Local value, else the current page's value when it can be lofted.
    pub fn get_output_value(&self, output: Output, mask: &Mask) -> Option<V> {
        if let Some(v) = self.local.read().get(&output) {
            return Some(v.clone());
        }
        let page = self.current_page?;
        let value = self.pages.read().get(&page)?.get(&output).cloned()?;
        self.lofted.add(output, mask).then_some(value)
    }

    pub fn is_lofted(&self, output: &Output) -> bool {
        self.lofted.contains(output)
    }

    /// Drop local data for `output` and the lofted elements in `mask`.
    pub fn invalidate_output(&self, output: Output, mask: &Mask) {
        self.local.write().remove(&output);
        self.lofted.remove(output.id, output.node, mask);
    }

    /// Lofted outputs among `deps`, which an invalidation of those dependents must also reach.
    pub fn pre_process_invalidation(&self, deps: &HashMap<Output, Mask>) -> Vec<MaskedOutput> {
        self.lofted.collect_lofted_dependencies(deps)
    }

    /// Invalidate `request` widened by its lofted dependents in `deps`.
    pub fn invalidate(&self, request: &[MaskedOutput], deps: &HashMap<Output, Mask>) {
        let widened = self.pre_process_invalidation(deps);
        for m in request.iter().chain(&widened) {
            self.invalidate_output(m.output, &m.mask);
        }
    }

    pub fn clear_data_for_output(&self, output: Output) {
        self.invalidate_output(output, &Mask::default());
    }

    pub fn will_delete_node(&mut self, node: &Node) {
        let local = self.local.get_mut();
        for output in node.outputs() {
            local.remove(output);
        }
        self.lofted.remove_all_outputs_for_node(node);
    }

    /// Drop all local data and lofted bookkeeping. Cache pages are kept.
    pub fn clear_data(&mut self) {
        self.local.get_mut().clear();
        self.lofted.clear();
    }

    pub fn clear_page_cache(&mut self) {
        self.pages.get_mut().clear();
        self.lofted.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/exec/executor.rs"]
mod tests;
