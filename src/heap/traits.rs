/*!
 * Heap Traits
 * Seams between the engine, its arena source, and callers
 */

use super::types::{BlockInfo, DataPtr, HeapResult, HeapStats};
use crate::core::types::{Offset, Size};

/// Contract with the collaborator owning the backing byte region.
///
/// The region grows monotonically while the heap is live; individual blocks
/// are never handed back. `reset` runs once, at heap teardown, releasing
/// everything grown past the recorded base.
pub trait ArenaSource {
    /// Current end of the region (what the next `grow` extends from)
    fn probe(&self) -> Offset;

    /// Extend the region by `bytes`, returning the previous end, or `None`
    /// when the source cannot grow further. A refused grow leaves the
    /// region untouched.
    fn grow(&mut self, bytes: Size) -> Option<Offset>;

    /// Release everything grown past `end`
    fn reset(&mut self, end: Offset);

    /// Hard ceiling the region can grow to
    fn capacity(&self) -> Size;

    /// Region contents; block headers live inline in these bytes
    fn bytes(&self) -> &[u8];

    /// Mutable region contents
    fn bytes_mut(&mut self) -> &mut [u8];
}

/// Allocator interface
pub trait Allocator: Send + Sync {
    /// Allocate a word-aligned block of at least `size` bytes
    fn alloc(&self, size: Size) -> HeapResult<DataPtr>;

    /// Return a block to the heap.
    ///
    /// The pointer must have come from this instance's `alloc` and must not
    /// have been freed already; neither precondition is checked.
    fn free(&self, ptr: DataPtr);
}

/// Heap introspection interface
pub trait HeapInspect: Send + Sync {
    /// Aggregate statistics
    fn stats(&self) -> HeapStats;

    /// Address-ordered snapshot of every block header
    fn blocks(&self) -> Vec<BlockInfo>;
}
