/*!
 * Allocation Scenario Test
 * Scripted walkthroughs shared by every placement strategy
 */

use arena_heap::heap::layout::{HEADER_SIZE, WORD_SIZE};
use arena_heap::{HeapManager, Strategy};
use pretty_assertions::assert_eq;

/// Two small allocations, free the first, allocate its size again: the
/// freed block must come back as-is, unmerged and ungrown.
fn run_free_then_reuse(strategy: Strategy) {
    let heap = HeapManager::new(strategy);

    let first = heap.alloc(3).unwrap();
    let second = heap.alloc(6).unwrap();
    assert_eq!(first.offset(), HEADER_SIZE);
    assert_eq!(second.offset(), 2 * HEADER_SIZE + WORD_SIZE);

    heap.free(first);

    // The freed block sits before a still-used one; nothing merges.
    let blocks = heap.blocks();
    assert_eq!(blocks.len(), 2, "{} must keep both blocks", strategy);
    assert!(!blocks[0].used);
    assert_eq!(blocks[0].size, WORD_SIZE);
    assert!(blocks[1].used);

    // An 8-byte request lands exactly on the freed block.
    let arena_before = heap.stats().arena_bytes;
    let reused = heap.alloc(8).unwrap();
    assert_eq!(reused, first, "{} must reuse the freed block", strategy);
    assert_eq!(heap.stats().arena_bytes, arena_before);
    assert_eq!(heap.stats().reuse_count, 1);
}

#[test]
fn test_free_then_reuse_first_fit() {
    run_free_then_reuse(Strategy::FirstFit);
}

#[test]
fn test_free_then_reuse_best_fit() {
    run_free_then_reuse(Strategy::BestFit);
}

// Next fit reuses it too: the cursor has never advanced, so the scan still
// starts from the list head.
#[test]
fn test_free_then_reuse_next_fit() {
    run_free_then_reuse(Strategy::NextFit);
}

/// A freed block of aligned size S satisfies a later request aligning to S
/// with no arena growth, whatever the policy.
fn run_reuse_without_growth(strategy: Strategy) {
    let heap = HeapManager::new(strategy);

    let block = heap.alloc(40).unwrap();
    heap.alloc(8).unwrap();
    heap.free(block);

    let grown_before = heap.stats().grow_count;
    let again = heap.alloc(37).unwrap();
    assert_eq!(again, block, "{} must recycle the only fit", strategy);
    assert_eq!(heap.stats().grow_count, grown_before);
}

#[test]
fn test_reuse_without_growth_first_fit() {
    run_reuse_without_growth(Strategy::FirstFit);
}

#[test]
fn test_reuse_without_growth_next_fit() {
    run_reuse_without_growth(Strategy::NextFit);
}

#[test]
fn test_reuse_without_growth_best_fit() {
    run_reuse_without_growth(Strategy::BestFit);
}

/// Mixed churn ends in a fully tiled arena with every byte accounted for.
fn run_churn_accounting(strategy: Strategy) {
    let heap = HeapManager::new(strategy);

    let mut live = Vec::new();
    for round in 0..64usize {
        live.push(heap.alloc(8 + (round % 7) * 8).unwrap());
        if round % 3 == 0 {
            let ptr = live.remove(live.len() / 2);
            heap.free(ptr);
        }
    }

    let stats = heap.stats();
    let blocks = heap.blocks();
    assert_eq!(stats.used_blocks, live.len());

    let mut expected = 0;
    for block in &blocks {
        assert_eq!(block.offset, expected, "{} left a tiling gap", strategy);
        assert_eq!(block.size % WORD_SIZE, 0);
        expected = block.end();
    }
    assert_eq!(expected, stats.arena_bytes);
    assert_eq!(
        stats.arena_bytes,
        stats.used_bytes + stats.free_bytes + stats.header_bytes
    );
}

#[test]
fn test_churn_accounting_first_fit() {
    run_churn_accounting(Strategy::FirstFit);
}

#[test]
fn test_churn_accounting_next_fit() {
    run_churn_accounting(Strategy::NextFit);
}

#[test]
fn test_churn_accounting_best_fit() {
    run_churn_accounting(Strategy::BestFit);
}
