//! Memory system.
//!
//! The APEX machine has a separate instruction store (the loaded program) and a flat
//! word-addressable data memory, which lives here.

/// Word-addressable data memory.
pub mod memory;

pub use memory::DataMemory;
