/*!
 * Limits and Constants
 *
 * Centralized location for crate-wide limits and default capacities.
 * All values include rationale comments explaining why they exist.
 */

use crate::core::types::Size;

/// Default arena capacity (256MB)
/// Hard ceiling for `VirtualArena` growth when none is configured; large
/// enough for benchmark churn, small enough to fail fast on runaway loops
pub const DEFAULT_ARENA_CAPACITY: Size = 256 * 1024 * 1024;

/// Arena capacity used by the demo binary when `HEAP_CAPACITY` is unset (64MB)
pub const DEMO_ARENA_CAPACITY: Size = 64 * 1024 * 1024;
