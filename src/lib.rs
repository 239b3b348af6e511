/*!
 * Arena Heap Library
 * Growable-arena allocator with inline block headers exposed as a library
 */

pub mod core;
pub mod heap;

// Re-exports
pub use heap::{
    Allocator, ArenaSource, BlockInfo, DataPtr, HeapConfig, HeapError, HeapInspect, HeapManager,
    HeapResult, HeapStats, Strategy, VirtualArena,
};
