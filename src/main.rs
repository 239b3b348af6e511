/*!
 * Arena Heap Demo - Main Entry Point
 *
 * Scripted walkthrough of the allocator:
 * - Block allocation, payload round-trips, and frees
 * - Free-block reuse under each placement strategy
 * - Splitting, forward merging, and arena growth statistics
 */

use std::env;
use std::error::Error;
use std::str::FromStr;

use arena_heap::core::limits::DEMO_ARENA_CAPACITY;
use arena_heap::{HeapConfig, HeapManager, Strategy};
use log::info;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Arena heap demo starting...");
    info!("================================================");

    let capacity = match env::var("HEAP_CAPACITY") {
        Ok(raw) => raw.parse()?,
        Err(_) => DEMO_ARENA_CAPACITY,
    };
    let strategies: Vec<Strategy> = match env::var("HEAP_STRATEGY") {
        Ok(raw) => vec![Strategy::from_str(&raw)?],
        Err(_) => Strategy::ALL.to_vec(),
    };

    for strategy in strategies {
        run_walkthrough(strategy, capacity)?;
    }

    info!("================================================");
    info!("Demo complete");
    Ok(())
}

fn run_walkthrough(strategy: Strategy, capacity: usize) -> Result<(), Box<dyn Error>> {
    info!("--- {} ---", strategy);
    let heap = HeapManager::with_config(
        HeapConfig::default()
            .with_strategy(strategy)
            .with_capacity(capacity),
    );

    let a = heap.alloc(24)?;
    let b = heap.alloc(13)?;
    let c = heap.alloc(64)?;
    info!("allocated three blocks: a={}, b={}, c={}", a, b, c);

    heap.write(b, b"heap demo")?;
    let echoed = heap.read(b, 9)?;
    info!("payload round-trip: {}", String::from_utf8_lossy(&echoed));

    heap.free(b);
    let d = heap.alloc(8)?;
    info!("freed b, allocated 8 bytes at {} (reused b: {})", d, d == b);

    // Churn a small working set to exercise reuse, splitting, and merging.
    let mut live = Vec::new();
    for round in 0..1000 {
        let size = 8 + (round % 10) * 8;
        live.push(heap.alloc(size)?);
        if live.len() == 8 {
            // Free in descending address order so each free absorbs the
            // block freed just before it.
            live.sort_by_key(|ptr| std::cmp::Reverse(ptr.offset()));
            for ptr in live.drain(..) {
                heap.free(ptr);
            }
        }
    }

    heap.free(a);
    heap.free(d);
    heap.free(c);
    let merged = heap.coalesce();
    info!("coalesce merged {} free block pairs", merged);

    for block in heap.blocks() {
        info!(
            "block 0x{:08x}: size={:6} used={}",
            block.offset, block.size, block.used
        );
    }

    let stats = heap.stats();
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
