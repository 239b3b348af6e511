/*!
 * Block Layout
 * Word-alignment arithmetic and the inline header geometry
 *
 * Every size the heap records is produced by `align`; every offset
 * translation between a block header and its payload goes through
 * `data_offset`/`header_offset`. Nothing else in the crate does this
 * arithmetic by hand.
 */

use crate::core::types::{Offset, Size};
use std::mem;

/// Machine word size; all payload sizes are multiples of this
pub const WORD_SIZE: Size = mem::size_of::<usize>();

/// Inline header: three words (size, used flag, next link)
pub const HEADER_SIZE: Size = 3 * WORD_SIZE;

/// Byte offset of the `size` field within a header
pub(super) const SIZE_FIELD: Offset = 0;

/// Byte offset of the `used` field within a header
pub(super) const USED_FIELD: Offset = WORD_SIZE;

/// Byte offset of the `next` field within a header
pub(super) const NEXT_FIELD: Offset = 2 * WORD_SIZE;

/// Smallest leftover worth splitting off: a header plus one word of payload
pub const MIN_REMAINDER: Size = HEADER_SIZE + WORD_SIZE;

/// Largest servable payload request: anything bigger cannot take a
/// word-aligned size plus an inline header without the extent wrapping
/// around the address space
pub const MAX_REQUEST: Size = usize::MAX - HEADER_SIZE - (WORD_SIZE - 1);

/// Padding needed to reach the next word boundary.
///
/// Deliberately returns a full word (not zero) when `initial` is already
/// word-aligned; `align` special-cases that input before consulting this.
pub fn padding(initial: Size) -> Size {
    WORD_SIZE - initial % WORD_SIZE
}

/// Rounds a requested size up to the machine word size.
///
/// Examples (word size 8):
///  - `align(3)` -> 8
///  - `align(8)` -> 8
///  - `align(9)` -> 16
///
/// Zero is the one special case: `align(0) == 0`, a zero-byte request is
/// never rounded up to a full word.
///
/// Callers keep requests at or below `MAX_REQUEST`; past that bound no
/// covering word multiple fits in a `usize`.
pub fn align(initial: Size) -> Size {
    if initial == 0 {
        return 0;
    }

    // Already aligned sizes pass through untouched; `padding` would report a
    // full extra word for them.
    if initial % WORD_SIZE == 0 {
        return initial;
    }

    initial + padding(initial)
}

/// Total arena bytes a block of the given payload size occupies
pub fn alloc_size(size: Size) -> Size {
    HEADER_SIZE + size
}

/// Offset of a block's payload, given its header offset
pub fn data_offset(header: Offset) -> Offset {
    header + HEADER_SIZE
}

/// Offset of a block's header, given its payload offset.
///
/// Inverse of `data_offset`; the payload begins at a fixed distance past the
/// header, so this is a single subtraction.
pub fn header_offset(data: Offset) -> Offset {
    debug_assert!(data >= HEADER_SIZE, "data offset 0x{data:x} precedes any possible header");
    data - HEADER_SIZE
}
