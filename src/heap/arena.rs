/*!
 * Virtual Arena
 * Vec-backed byte region with a hard growth ceiling
 */

use super::traits::ArenaSource;
use crate::core::limits::DEFAULT_ARENA_CAPACITY;
use crate::core::types::{Offset, Size};
use log::debug;

/// In-process arena backed by a growable byte buffer.
///
/// Offsets handed out by `grow` stay stable for the lifetime of the arena,
/// so block headers written into the region survive later growth.
pub struct VirtualArena {
    bytes: Vec<u8>,
    capacity: Size,
}

impl VirtualArena {
    /// Arena with the default growth ceiling
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_ARENA_CAPACITY)
    }

    /// Arena with a custom growth ceiling (small ceilings make exhaustion
    /// testable without allocating hundreds of megabytes)
    pub fn with_capacity(capacity: Size) -> Self {
        Self {
            bytes: Vec::new(),
            capacity,
        }
    }
}

impl Default for VirtualArena {
    fn default() -> Self {
        Self::new()
    }
}

impl ArenaSource for VirtualArena {
    fn probe(&self) -> Offset {
        self.bytes.len()
    }

    fn grow(&mut self, bytes: Size) -> Option<Offset> {
        let previous = self.bytes.len();
        let target = previous.checked_add(bytes)?;
        if target > self.capacity {
            debug!(
                "arena growth refused: {} + {} exceeds capacity {}",
                previous, bytes, self.capacity
            );
            return None;
        }
        // Fresh extent is zeroed; payloads never leak between blocks.
        self.bytes.resize(target, 0);
        debug!("arena grew by {} bytes to {}", bytes, target);
        Some(previous)
    }

    fn reset(&mut self, end: Offset) {
        if end < self.bytes.len() {
            debug!("arena reset from {} to {}", self.bytes.len(), end);
            self.bytes.truncate(end);
        }
    }

    fn capacity(&self) -> Size {
        self.capacity
    }

    fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }
}
