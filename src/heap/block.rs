/*!
 * Block Headers
 * Inline header encoding over the arena bytes
 */

use super::layout::{NEXT_FIELD, SIZE_FIELD, USED_FIELD, WORD_SIZE};
use crate::core::types::{Offset, Size};

/// Link word standing in for "no successor"
const NIL: usize = usize::MAX;

/// Decoded view of one inline header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Header {
    pub size: Size,
    pub used: bool,
    pub next: Option<Offset>,
}

fn read_word(bytes: &[u8], at: Offset) -> usize {
    let mut raw = [0u8; WORD_SIZE];
    raw.copy_from_slice(&bytes[at..at + WORD_SIZE]);
    usize::from_ne_bytes(raw)
}

fn write_word(bytes: &mut [u8], at: Offset, value: usize) {
    bytes[at..at + WORD_SIZE].copy_from_slice(&value.to_ne_bytes());
}

fn encode_link(next: Option<Offset>) -> usize {
    match next {
        Some(offset) => offset,
        None => NIL,
    }
}

fn decode_link(word: usize) -> Option<Offset> {
    (word != NIL).then_some(word)
}

/// Decode the header starting at `header`
pub(super) fn load(bytes: &[u8], header: Offset) -> Header {
    Header {
        size: read_word(bytes, header + SIZE_FIELD),
        used: read_word(bytes, header + USED_FIELD) != 0,
        next: decode_link(read_word(bytes, header + NEXT_FIELD)),
    }
}

/// Encode a full header starting at `header`
pub(super) fn store(bytes: &mut [u8], header: Offset, value: Header) {
    write_word(bytes, header + SIZE_FIELD, value.size);
    write_word(bytes, header + USED_FIELD, value.used as usize);
    write_word(bytes, header + NEXT_FIELD, encode_link(value.next));
}

pub(super) fn set_size(bytes: &mut [u8], header: Offset, size: Size) {
    write_word(bytes, header + SIZE_FIELD, size);
}

pub(super) fn set_used(bytes: &mut [u8], header: Offset, used: bool) {
    write_word(bytes, header + USED_FIELD, used as usize);
}

pub(super) fn set_next(bytes: &mut [u8], header: Offset, next: Option<Offset>) {
    write_word(bytes, header + NEXT_FIELD, encode_link(next));
}
