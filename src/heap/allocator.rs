/*!
 * Heap Engine
 * Allocation, deallocation, and payload access over one arena
 */

use super::block;
use super::layout::{self, HEADER_SIZE, WORD_SIZE};
use super::traits::ArenaSource;
use super::types::{BlockInfo, DataPtr, HeapError, HeapResult, HeapStats, Strategy};
use crate::core::types::{Offset, Size};
use log::{debug, error, info, warn};

/// Monotone operation counters surfaced through `HeapStats`
#[derive(Debug, Default, Clone, Copy)]
pub(super) struct OpCounters {
    pub allocs: u64,
    pub frees: u64,
    pub reuses: u64,
    pub grows: u64,
    pub splits: u64,
    pub merges: u64,
}

/// The engine: one arena source, one block list, one strategy.
///
/// Not synchronized; `HeapManager` owns the instance mutex around it.
pub(super) struct Heap {
    pub(super) source: Box<dyn ArenaSource + Send>,
    /// Arena end at construction; everything past it belongs to this heap
    pub(super) base: Offset,
    pub(super) strategy: Strategy,
    /// Lowest-address block header, or `None` before the first allocation
    pub(super) start: Option<Offset>,
    /// Highest-address block header
    pub(super) end: Option<Offset>,
    /// Where the next-fit scan resumes
    pub(super) cursor: Option<Offset>,
    pub(super) counters: OpCounters,
}

impl Heap {
    pub(super) fn new(strategy: Strategy, source: Box<dyn ArenaSource + Send>) -> Self {
        let base = source.probe();
        Self {
            source,
            base,
            strategy,
            start: None,
            end: None,
            cursor: None,
            counters: OpCounters::default(),
        }
    }

    /// Allocate a block whose payload holds at least `size` bytes.
    ///
    /// The size is rounded up to the machine word; requests the rounding
    /// cannot make representable are refused. Reuses a free block when the
    /// placement scan finds one, otherwise grows the arena by exactly one
    /// block extent.
    pub(super) fn alloc(&mut self, size: Size) -> HeapResult<DataPtr> {
        if size > layout::MAX_REQUEST {
            // The extent arithmetic would wrap before any source was asked.
            return Err(self.exhausted(Size::MAX));
        }
        let aligned = layout::align(size);
        if aligned == 0 {
            return Err(HeapError::ZeroSize);
        }
        self.counters.allocs += 1;

        if let Some(header) = self.find_fit(aligned) {
            self.counters.reuses += 1;
            debug!(
                "reused block 0x{:x} for {} bytes ({})",
                header, aligned, self.strategy
            );
            return Ok(DataPtr(layout::data_offset(header)));
        }

        let header = self.request_extent(aligned)?;
        self.append_block(header, aligned);
        debug!("grew arena for {} bytes at 0x{:x}", aligned, header);
        Ok(DataPtr(layout::data_offset(header)))
    }

    /// Grow the arena by one header-plus-payload extent
    fn request_extent(&mut self, aligned: Size) -> HeapResult<Offset> {
        let grown = aligned
            .checked_add(HEADER_SIZE)
            .and_then(|total| self.source.grow(total));
        match grown {
            Some(previous_end) => {
                self.counters.grows += 1;
                Ok(previous_end)
            }
            None => Err(self.exhausted(aligned.saturating_add(HEADER_SIZE))),
        }
    }

    /// Exhaustion error carrying the arena occupancy at the moment of refusal
    fn exhausted(&self, requested: Size) -> HeapError {
        let used = self.source.probe() - self.base;
        let capacity = self.source.capacity();
        error!(
            "arena exhausted: {} byte extent refused with {} of {} in use",
            requested, used, capacity
        );
        HeapError::ArenaExhausted {
            requested,
            used,
            capacity,
        }
    }

    /// Return a block to the heap.
    ///
    /// When the block's successor is already free the two are merged first;
    /// merging never looks backward. The pointer must have come from `alloc`
    /// and must not already be freed; this is the one unchecked entry point,
    /// matching the usual contract for a deallocator.
    pub(super) fn free(&mut self, ptr: DataPtr) {
        let header = layout::header_offset(ptr.offset());
        debug_assert!(
            header >= self.base && header + HEADER_SIZE <= self.source.probe(),
            "{ptr} does not belong to this arena"
        );
        debug_assert_eq!(
            (header - self.base) % WORD_SIZE,
            0,
            "{ptr} is not a block boundary"
        );

        self.counters.frees += 1;
        self.merge_forward(header);
        block::set_used(self.source.bytes_mut(), header, false);
        debug!("freed block 0x{:x}", header);
    }

    /// Copy `data` into the block's payload, starting at its first byte
    pub(super) fn write(&mut self, ptr: DataPtr, data: &[u8]) -> HeapResult<()> {
        let header = self.checked_header(ptr)?;
        let size = block::load(self.source.bytes(), header).size;
        if data.len() > size {
            return Err(HeapError::RangeExceeded {
                requested: data.len(),
                size,
            });
        }
        let at = ptr.offset();
        self.source.bytes_mut()[at..at + data.len()].copy_from_slice(data);
        Ok(())
    }

    /// Copy the first `len` payload bytes out of the block
    pub(super) fn read(&self, ptr: DataPtr, len: Size) -> HeapResult<Vec<u8>> {
        let header = self.checked_header(ptr)?;
        let size = block::load(self.source.bytes(), header).size;
        if len > size {
            return Err(HeapError::RangeExceeded {
                requested: len,
                size,
            });
        }
        let at = ptr.offset();
        Ok(self.source.bytes()[at..at + len].to_vec())
    }

    /// Validate a pointer for payload access: inside the arena, on a block
    /// boundary, and heading a live block. Freed blocks fail here, so reads
    /// cannot resurrect stale data.
    fn checked_header(&self, ptr: DataPtr) -> HeapResult<Offset> {
        let at = ptr.offset();
        let arena_end = self.source.probe();
        if at < self.base + HEADER_SIZE || at > arena_end {
            warn!("rejected payload access at {}: outside the arena", ptr);
            return Err(HeapError::InvalidPointer(at));
        }
        let header = layout::header_offset(at);
        if (header - self.base) % WORD_SIZE != 0 {
            warn!("rejected payload access at {}: not a block boundary", ptr);
            return Err(HeapError::InvalidPointer(at));
        }
        let head = block::load(self.source.bytes(), header);
        // The size word is untrusted here; keep it out of the arithmetic.
        if !head.used || head.size > arena_end - at {
            warn!("rejected payload access at {}: block is not live", ptr);
            return Err(HeapError::InvalidPointer(at));
        }
        Ok(header)
    }

    /// Aggregate statistics over one walk of the block list
    pub(super) fn stats(&self) -> HeapStats {
        let mut block_count = 0;
        let mut used_blocks = 0;
        let mut free_blocks = 0;
        let mut used_bytes = 0;
        let mut free_bytes = 0;
        let mut largest_free_block = 0;
        for (_, head) in self.iter() {
            block_count += 1;
            if head.used {
                used_blocks += 1;
                used_bytes += head.size;
            } else {
                free_blocks += 1;
                free_bytes += head.size;
                largest_free_block = largest_free_block.max(head.size);
            }
        }

        let capacity = self.source.capacity();
        let arena_bytes = self.source.probe() - self.base;
        HeapStats {
            strategy: self.strategy,
            capacity,
            arena_bytes,
            used_bytes,
            free_bytes,
            header_bytes: block_count * HEADER_SIZE,
            block_count,
            used_blocks,
            free_blocks,
            largest_free_block,
            usage_percentage: if capacity > 0 {
                (arena_bytes as f64 / capacity as f64) * 100.0
            } else {
                0.0
            },
            alloc_count: self.counters.allocs,
            free_count: self.counters.frees,
            reuse_count: self.counters.reuses,
            grow_count: self.counters.grows,
            split_count: self.counters.splits,
            merge_count: self.counters.merges,
        }
    }

    /// Address-ordered snapshot of every block header
    pub(super) fn blocks(&self) -> Vec<BlockInfo> {
        self.iter()
            .map(|(offset, head)| BlockInfo {
                offset,
                size: head.size,
                used: head.used,
            })
            .collect()
    }
}

impl Drop for Heap {
    fn drop(&mut self) {
        let held = self.source.probe() - self.base;
        self.source.reset(self.base);
        if held > 0 {
            info!("heap torn down, released {} arena bytes", held);
        }
    }
}
