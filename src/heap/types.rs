/*!
 * Heap Types
 * Common types for the heap subsystem
 */

use super::layout;
use crate::core::limits::DEFAULT_ARENA_CAPACITY;
use crate::core::types::{Offset, Size};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Heap operation result
pub type HeapResult<T> = Result<T, HeapError>;

/// Heap errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HeapError {
    #[error(
        "arena exhausted: requested {requested} bytes, {used} bytes in use of {capacity} capacity"
    )]
    ArenaExhausted {
        requested: Size,
        used: Size,
        capacity: Size,
    },

    #[error("zero-byte allocation request")]
    ZeroSize,

    #[error("invalid data pointer: 0x{0:x}")]
    InvalidPointer(Offset),

    #[error("access of {requested} bytes exceeds block size {size}")]
    RangeExceeded { requested: Size, size: Size },
}

/// Placement strategy: the policy choosing which free block satisfies a
/// request. Fixed for the lifetime of a heap instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// First qualifying block from the start of the list
    FirstFit,
    /// First qualifying block from a roaming cursor, wrapping at the end
    NextFit,
    /// Smallest qualifying block over the whole list, ties to the earliest
    BestFit,
}

impl Strategy {
    /// Every strategy, in declaration order; used by the demo and benches
    pub const ALL: [Strategy; 3] = [Strategy::FirstFit, Strategy::NextFit, Strategy::BestFit];
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Strategy::FirstFit => write!(f, "first_fit"),
            Strategy::NextFit => write!(f, "next_fit"),
            Strategy::BestFit => write!(f, "best_fit"),
        }
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first_fit" | "first-fit" => Ok(Strategy::FirstFit),
            "next_fit" | "next-fit" => Ok(Strategy::NextFit),
            "best_fit" | "best-fit" => Ok(Strategy::BestFit),
            other => Err(format!("unknown placement strategy: {other:?}")),
        }
    }
}

/// Opaque handle to an allocated payload.
///
/// Only meaningful to the heap instance that issued it; handing it to any
/// other instance, or using it after `free`, violates the caller contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DataPtr(pub(super) Offset);

impl DataPtr {
    /// Raw arena offset of the payload (diagnostics only)
    pub fn offset(&self) -> Offset {
        self.0
    }
}

impl fmt::Display for DataPtr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

/// Heap construction parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeapConfig {
    pub strategy: Strategy,
    pub capacity: Size,
}

impl Default for HeapConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::FirstFit,
            capacity: DEFAULT_ARENA_CAPACITY,
        }
    }
}

impl HeapConfig {
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_capacity(mut self, capacity: Size) -> Self {
        self.capacity = capacity;
        self
    }
}

/// Snapshot of one block header, in address order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockInfo {
    pub offset: Offset,
    pub size: Size,
    pub used: bool,
}

impl BlockInfo {
    /// Arena bytes the block occupies, header included
    pub fn span(&self) -> Size {
        layout::alloc_size(self.size)
    }

    /// Offset one past the block's last payload byte
    pub fn end(&self) -> Offset {
        self.offset + self.span()
    }
}

/// Heap statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeapStats {
    pub strategy: Strategy,
    pub capacity: Size,
    /// Bytes grown from the arena source so far (headers included)
    pub arena_bytes: Size,
    /// Payload bytes held by used blocks
    pub used_bytes: Size,
    /// Payload bytes held by free blocks
    pub free_bytes: Size,
    /// Bytes spent on inline headers
    pub header_bytes: Size,
    pub block_count: usize,
    pub used_blocks: usize,
    pub free_blocks: usize,
    pub largest_free_block: Size,
    pub usage_percentage: f64,
    pub alloc_count: u64,
    pub free_count: u64,
    /// Allocations satisfied from the free list instead of arena growth
    pub reuse_count: u64,
    pub grow_count: u64,
    pub split_count: u64,
    pub merge_count: u64,
}
