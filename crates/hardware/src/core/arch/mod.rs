//! Architectural register state.
//!
//! This module contains the register renaming machinery. It includes the following modules:
//! 1. **Pool:** The physical register arena (value and valid bit per register).
//! 2. **URF:** Speculative and committed rename tables with the free-list allocator.

/// Physical register arena.
pub mod pool;

/// Unified register file (RAT, RRAT, allocation).
pub mod urf;

pub use pool::{PhysicalRegister, RegisterPool};
pub use urf::{Released, Urf};
