/*!
 * Placement Strategies
 * Free-block search policies over the block list
 */

use super::allocator::Heap;
use super::block;
use super::types::Strategy;
use crate::core::types::{Offset, Size};

impl Heap {
    /// Run the configured placement scan. A hit is split down to `size`
    /// where worthwhile and marked used before it is returned; a miss means
    /// the caller must grow the arena.
    pub(super) fn find_fit(&mut self, size: Size) -> Option<Offset> {
        let found = match self.strategy {
            Strategy::FirstFit => self.first_fit(size),
            Strategy::NextFit => self.next_fit(size),
            Strategy::BestFit => self.best_fit(size),
        }?;
        self.list_allocate(found, size);
        Some(found)
    }

    /// Lowest-address free block that fits
    fn first_fit(&self, size: Size) -> Option<Offset> {
        let bytes = self.source.bytes();
        let mut current = self.start;
        while let Some(header) = current {
            let head = block::load(bytes, header);
            if !head.used && head.size >= size {
                return Some(header);
            }
            current = head.next;
        }
        None
    }

    /// First fit resumed from the previous hit. The scan starts at the
    /// cursor (list head before any hit), wraps past the tail, and gives up
    /// when it comes back around to where it started.
    fn next_fit(&mut self, size: Size) -> Option<Offset> {
        let origin = self.cursor.or(self.start)?;
        let bytes = self.source.bytes();
        let mut current = origin;
        loop {
            let head = block::load(bytes, current);
            if !head.used && head.size >= size {
                self.cursor = Some(current);
                return Some(current);
            }
            current = match head.next {
                Some(next) => next,
                None => self.start?,
            };
            if current == origin {
                return None;
            }
        }
    }

    /// Tightest free block that fits, via a full scan of the list.
    /// Strict comparison keeps the earliest block on ties, and an exact fit
    /// still walks the rest of the list.
    fn best_fit(&self, size: Size) -> Option<Offset> {
        let bytes = self.source.bytes();
        let mut best: Option<(Offset, Size)> = None;
        let mut current = self.start;
        while let Some(header) = current {
            let head = block::load(bytes, header);
            if !head.used && head.size >= size {
                let tighter = match best {
                    Some((_, best_size)) => head.size < best_size,
                    None => true,
                };
                if tighter {
                    best = Some((header, head.size));
                }
            }
            current = head.next;
        }
        best.map(|(header, _)| header)
    }
}
