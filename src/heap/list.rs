/*!
 * Block List
 * Address-ordered singly-linked list surgery over inline headers
 */

use super::allocator::Heap;
use super::block::{self, Header};
use super::layout::{self, HEADER_SIZE, MIN_REMAINDER};
use crate::core::types::{Offset, Size};
use log::{debug, info};

/// Address-ordered walk over the block list
pub(super) struct Blocks<'a> {
    bytes: &'a [u8],
    current: Option<Offset>,
}

impl Iterator for Blocks<'_> {
    type Item = (Offset, Header);

    fn next(&mut self) -> Option<Self::Item> {
        let header = self.current?;
        let head = block::load(self.bytes, header);
        self.current = head.next;
        Some((header, head))
    }
}

impl Heap {
    pub(super) fn iter(&self) -> Blocks<'_> {
        Blocks {
            bytes: self.source.bytes(),
            current: self.start,
        }
    }

    /// Link a freshly grown extent in as the new tail block, already used
    pub(super) fn append_block(&mut self, header: Offset, size: Size) {
        block::store(
            self.source.bytes_mut(),
            header,
            Header {
                size,
                used: true,
                next: None,
            },
        );
        match self.end {
            Some(end) => block::set_next(self.source.bytes_mut(), end, Some(header)),
            None => self.start = Some(header),
        }
        self.end = Some(header);
    }

    /// Prepare a found free block for handout: carve off an oversized tail
    /// when the leftover can hold a header plus one word, then mark it used.
    /// A leftover below that floor stays attached, so the block may hand out
    /// more than was asked for.
    pub(super) fn list_allocate(&mut self, header: Offset, size: Size) {
        let current = block::load(self.source.bytes(), header).size;
        if current - size >= MIN_REMAINDER {
            self.split_block(header, size);
        }
        block::set_used(self.source.bytes_mut(), header, true);
    }

    /// Shrink `header` to exactly `size` bytes of payload and link the
    /// remainder in behind it as a fresh free block.
    ///
    /// Caller guarantees the remainder holds a header plus at least one
    /// word, so both halves keep the arena tiled edge to edge.
    pub(super) fn split_block(&mut self, header: Offset, size: Size) {
        let head = block::load(self.source.bytes(), header);
        let remainder = head.size - size - HEADER_SIZE;
        let tail = header + layout::alloc_size(size);

        let bytes = self.source.bytes_mut();
        block::store(
            bytes,
            tail,
            Header {
                size: remainder,
                used: false,
                next: head.next,
            },
        );
        block::set_size(bytes, header, size);
        block::set_next(bytes, header, Some(tail));

        if self.end == Some(header) {
            self.end = Some(tail);
        }
        self.counters.splits += 1;
        debug!(
            "split block 0x{:x}: {} -> {} + {}",
            header, head.size, size, remainder
        );
    }

    /// Absorb the successor of `header` when both sides are mergeable:
    /// the successor must exist and be free. Returns whether a merge ran.
    ///
    /// Only looks forward; the predecessor is unreachable without a back
    /// link, so freeing in ascending address order never merges.
    pub(super) fn merge_forward(&mut self, header: Offset) -> bool {
        let head = block::load(self.source.bytes(), header);
        let next = match head.next {
            Some(next) => next,
            None => return false,
        };
        let successor = block::load(self.source.bytes(), next);
        if successor.used {
            return false;
        }

        let bytes = self.source.bytes_mut();
        block::set_size(bytes, header, head.size + HEADER_SIZE + successor.size);
        block::set_next(bytes, header, successor.next);

        // The absorbed block may have been a list anchor; repoint both at
        // the surviving block.
        if self.end == Some(next) {
            self.end = Some(header);
        }
        if self.cursor == Some(next) {
            self.cursor = Some(header);
        }
        self.counters.merges += 1;
        debug!("merged block 0x{:x} into 0x{:x}", next, header);
        true
    }

    /// Collapse every run of adjacent free blocks into one block per run.
    /// Returns the number of merges performed.
    pub(super) fn coalesce(&mut self) -> usize {
        let mut merged = 0;
        let mut current = self.start;
        while let Some(header) = current {
            let head = block::load(self.source.bytes(), header);
            match head.next {
                Some(next) if !head.used && !block::load(self.source.bytes(), next).used => {
                    // Stay on this block; it may absorb several successors.
                    self.merge_forward(header);
                    merged += 1;
                }
                _ => current = head.next,
            }
        }
        if merged > 0 {
            info!("coalesced {} free block pairs", merged);
        }
        merged
    }
}
