/*!
 * Core Module
 * Fundamental types and crate-wide limits
 */

pub mod limits;
pub mod types;

// Re-export for convenience
pub use types::*;
