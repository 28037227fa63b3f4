//! Pipeline Latch Interface.
//!
//! This module defines the common trait for functional-unit latch chains. It provides:
//! 1. **Advance:** Shifting every occupied stage one step downstream.
//! 2. **Flush:** Discarding everything in flight on a squash.
//! 3. **Status:** Emptiness checks used by tests and the console.

/// A chain of single-entry latches inside a functional unit.
pub trait PipelineLatch {
    /// Moves each entry one stage downstream at the start of a cycle.
    ///
    /// An entry leaving the last stage has already been written back and is dropped.
    fn advance(&mut self);

    /// Clears all entries in the latch chain.
    ///
    /// Called when a taken branch retires.
    fn flush(&mut self);

    /// Checks if the latch chain is empty.
    ///
    /// # Returns
    ///
    /// `true` if no stage holds an instruction.
    fn is_empty(&self) -> bool;
}
