//! Core processor implementation.
//!
//! This module contains the CPU state, the register renaming machinery, the
//! out-of-order pipeline and the functional-unit semantics it drives.

/// Register renaming (physical register arena, URF).
pub mod arch;

/// CPU architectural state.
pub mod cpu;

/// Instruction pipeline implementation (frontend, backend, IQ, ROB).
pub mod pipeline;

/// Functional-unit semantics (ALU, branch, load/store).
pub mod units;

pub use self::cpu::Cpu;
