/*!
 * Arena Source Tests
 * Verifies the contract between the heap and its backing region
 */

use arena_heap::core::limits::DEFAULT_ARENA_CAPACITY;
use arena_heap::heap::layout::HEADER_SIZE;
use arena_heap::{ArenaSource, HeapError, HeapManager, Strategy, VirtualArena};
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

/// `VirtualArena` wrapper that records every call crossing the seam.
/// Counters live behind `Arc` so the test can inspect them after the heap
/// (and the source inside it) is gone.
struct CountingSource {
    inner: VirtualArena,
    grow_calls: Arc<AtomicUsize>,
    grow_sizes: Arc<Mutex<Vec<usize>>>,
    reset_calls: Arc<AtomicUsize>,
    last_reset_end: Arc<AtomicUsize>,
}

impl CountingSource {
    fn new(capacity: usize) -> Self {
        Self {
            inner: VirtualArena::with_capacity(capacity),
            grow_calls: Arc::new(AtomicUsize::new(0)),
            grow_sizes: Arc::new(Mutex::new(Vec::new())),
            reset_calls: Arc::new(AtomicUsize::new(0)),
            last_reset_end: Arc::new(AtomicUsize::new(usize::MAX)),
        }
    }
}

impl ArenaSource for CountingSource {
    fn probe(&self) -> usize {
        self.inner.probe()
    }

    fn grow(&mut self, bytes: usize) -> Option<usize> {
        self.grow_calls.fetch_add(1, Ordering::SeqCst);
        self.grow_sizes.lock().push(bytes);
        self.inner.grow(bytes)
    }

    fn reset(&mut self, end: usize) {
        self.reset_calls.fetch_add(1, Ordering::SeqCst);
        self.last_reset_end.store(end, Ordering::SeqCst);
        self.inner.reset(end);
    }

    fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    fn bytes(&self) -> &[u8] {
        self.inner.bytes()
    }

    fn bytes_mut(&mut self) -> &mut [u8] {
        self.inner.bytes_mut()
    }
}

#[test]
fn test_one_grow_per_allocation_miss() {
    let source = CountingSource::new(4096);
    let grow_calls = source.grow_calls.clone();

    let heap = HeapManager::with_source(Strategy::FirstFit, Box::new(source));
    let a = heap.alloc(16).unwrap();
    heap.alloc(16).unwrap();
    heap.alloc(16).unwrap();
    assert_eq!(grow_calls.load(Ordering::SeqCst), 3);

    // Recycling never touches the source.
    heap.free(a);
    heap.alloc(16).unwrap();
    assert_eq!(grow_calls.load(Ordering::SeqCst), 3);
}

#[test]
fn test_grow_requests_include_header() {
    let source = CountingSource::new(4096);
    let grow_sizes = source.grow_sizes.clone();

    let heap = HeapManager::with_source(Strategy::FirstFit, Box::new(source));
    heap.alloc(3).unwrap();
    heap.alloc(16).unwrap();
    heap.alloc(100).unwrap();

    // One extent per miss: aligned payload plus one header.
    assert_eq!(
        *grow_sizes.lock(),
        vec![HEADER_SIZE + 8, HEADER_SIZE + 16, HEADER_SIZE + 104]
    );
}

#[test]
fn test_heap_claims_region_from_recorded_base() {
    let mut source = CountingSource::new(4096);

    // Someone else already owns the first 40 bytes of this region.
    assert_eq!(source.grow(40), Some(0));

    let heap = HeapManager::with_source(Strategy::FirstFit, Box::new(source));
    let ptr = heap.alloc(8).unwrap();

    // The first block starts at the recorded base, not at offset zero.
    assert_eq!(ptr.offset(), 40 + HEADER_SIZE);
    let blocks = heap.blocks();
    assert_eq!(blocks[0].offset, 40);
}

#[test]
fn test_teardown_resets_to_base() {
    let source = CountingSource::new(4096);
    let reset_calls = source.reset_calls.clone();
    let last_reset_end = source.last_reset_end.clone();

    {
        let heap = HeapManager::with_source(Strategy::FirstFit, Box::new(source));
        heap.alloc(64).unwrap();
        heap.alloc(64).unwrap();
        assert_eq!(reset_calls.load(Ordering::SeqCst), 0);
    }

    // Dropping the last handle released the whole grown region.
    assert_eq!(reset_calls.load(Ordering::SeqCst), 1);
    assert_eq!(last_reset_end.load(Ordering::SeqCst), 0);
}

#[test]
fn test_teardown_preserves_foreign_prefix() {
    let mut source = CountingSource::new(4096);
    source.grow(64);
    let last_reset_end = source.last_reset_end.clone();

    {
        let heap = HeapManager::with_source(Strategy::BestFit, Box::new(source));
        heap.alloc(128).unwrap();
    }

    // Only the heap's own growth is released; the prefix stays claimed.
    assert_eq!(last_reset_end.load(Ordering::SeqCst), 64);
}

#[test]
fn test_refused_growth_surfaces_as_exhaustion() {
    let source = CountingSource::new(64);
    let grow_calls = source.grow_calls.clone();

    let heap = HeapManager::with_source(Strategy::FirstFit, Box::new(source));
    let ptr = heap.alloc(8).unwrap();

    // 32 of 64 grown; a 40-byte payload needs a 64-byte extent.
    assert_eq!(
        heap.alloc(40),
        Err(HeapError::ArenaExhausted {
            requested: HEADER_SIZE + 40,
            used: 32,
            capacity: 64,
        })
    );
    assert_eq!(grow_calls.load(Ordering::SeqCst), 2);

    // The refused call changed nothing; recycling still works.
    heap.free(ptr);
    assert_eq!(heap.alloc(8).unwrap(), ptr);
    assert_eq!(grow_calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_default_source_capacity() {
    let heap = HeapManager::new(Strategy::FirstFit);
    assert_eq!(heap.stats().capacity, DEFAULT_ARENA_CAPACITY);

    let arena = VirtualArena::new();
    assert_eq!(arena.capacity(), DEFAULT_ARENA_CAPACITY);
    assert_eq!(arena.probe(), 0);
}
