/*!
 * Heap
 * Free-list arena allocator with pluggable placement strategies
 */

mod allocator;
mod arena;
mod block;
mod list;
mod strategy;
mod traits;
mod types;

pub mod layout;

pub use arena::VirtualArena;
pub use traits::{Allocator, ArenaSource, HeapInspect};
pub use types::{BlockInfo, DataPtr, HeapConfig, HeapError, HeapResult, HeapStats, Strategy};

use crate::core::types::Size;
use allocator::Heap;
use log::info;
use parking_lot::Mutex;
use std::sync::Arc;

/// Thread-safe handle to one heap instance.
///
/// Clones share the same arena and block list. Every operation holds the
/// instance lock for its full duration, so list surgery is never observed
/// half-done and no state leaks across instances.
#[derive(Clone)]
pub struct HeapManager {
    inner: Arc<Mutex<Heap>>,
}

impl HeapManager {
    /// Heap over a fresh `VirtualArena` with the default growth ceiling
    pub fn new(strategy: Strategy) -> Self {
        Self::with_config(HeapConfig::default().with_strategy(strategy))
    }

    /// Heap with an explicit growth ceiling
    pub fn with_capacity(strategy: Strategy, capacity: Size) -> Self {
        Self::with_config(HeapConfig { strategy, capacity })
    }

    pub fn with_config(config: HeapConfig) -> Self {
        Self::with_source(
            config.strategy,
            Box::new(VirtualArena::with_capacity(config.capacity)),
        )
    }

    /// Heap over a caller-provided arena source
    pub fn with_source(strategy: Strategy, source: Box<dyn ArenaSource + Send>) -> Self {
        let heap = Heap::new(strategy, source);
        info!(
            "heap initialized: strategy={}, capacity={} bytes",
            strategy,
            heap.source.capacity()
        );
        Self {
            inner: Arc::new(Mutex::new(heap)),
        }
    }

    /// Placement strategy this instance was built with
    pub fn strategy(&self) -> Strategy {
        self.inner.lock().strategy
    }

    /// Allocate a word-aligned block of at least `size` bytes
    pub fn alloc(&self, size: Size) -> HeapResult<DataPtr> {
        self.inner.lock().alloc(size)
    }

    /// Return a block to the heap.
    ///
    /// The pointer must have come from this instance's `alloc` and must not
    /// have been freed already; neither precondition is checked.
    pub fn free(&self, ptr: DataPtr) {
        self.inner.lock().free(ptr)
    }

    /// Copy `data` into the block's payload, starting at its first byte
    pub fn write(&self, ptr: DataPtr, data: &[u8]) -> HeapResult<()> {
        self.inner.lock().write(ptr, data)
    }

    /// Copy the first `len` payload bytes out of the block
    pub fn read(&self, ptr: DataPtr, len: Size) -> HeapResult<Vec<u8>> {
        self.inner.lock().read(ptr, len)
    }

    /// Merge every run of adjacent free blocks; returns merges performed.
    /// Freeing already merges forward, so this is maintenance for the runs
    /// that ascending-order frees leave behind.
    pub fn coalesce(&self) -> usize {
        self.inner.lock().coalesce()
    }

    /// Aggregate statistics
    pub fn stats(&self) -> HeapStats {
        self.inner.lock().stats()
    }

    /// Address-ordered snapshot of every block header
    pub fn blocks(&self) -> Vec<BlockInfo> {
        self.inner.lock().blocks()
    }
}

impl Default for HeapManager {
    fn default() -> Self {
        Self::with_config(HeapConfig::default())
    }
}

impl Allocator for HeapManager {
    fn alloc(&self, size: Size) -> HeapResult<DataPtr> {
        HeapManager::alloc(self, size)
    }

    fn free(&self, ptr: DataPtr) {
        HeapManager::free(self, ptr)
    }
}

impl HeapInspect for HeapManager {
    fn stats(&self) -> HeapStats {
        HeapManager::stats(self)
    }

    fn blocks(&self) -> Vec<BlockInfo> {
        HeapManager::blocks(self)
    }
}
