/*!
 * Core Types
 * Common aliases used across the crate
 */

/// Byte offset into the arena
pub type Offset = usize;

/// Size type for allocation requests and block payloads
pub type Size = usize;
