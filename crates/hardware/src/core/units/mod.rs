//! Execution units.
//!
//! This module contains the pure semantics of the processor's functional units. The
//! latch chains that sequence them through the pipeline live in the back end.

/// Arithmetic Logic Unit for integer operations (also used by the multiplier).
pub mod alu;

/// Branch Resolution Unit.
pub mod bru;

/// Load/Store Unit address generation and memory access.
pub mod lsu;
