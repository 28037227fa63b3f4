//! APEX out-of-order pipeline simulator library.
//!
//! This crate implements a cycle-level simulator of a speculative, out-of-order APEX
//! processor with the following:
//! 1. **Core:** Register renaming (URF, RAT, RRAT), issue queue, reorder buffer and
//!    ALU, multiplier, branch and load/store units with result forwarding.
//! 2. **ISA:** The APEX instruction set, its opcode table and an assembly parser.
//! 3. **Memory:** Word-addressable data memory with checked accesses.
//! 4. **Simulation:** Driver, program loader, configuration and statistics.

/// Common types (errors, register identifiers).
pub mod common;
/// Simulator configuration (defaults, sections, validation).
pub mod config;
/// CPU core (renaming, pipeline, functional units).
pub mod core;
/// Instruction set (opcodes, instructions, assembly decoding).
pub mod isa;
/// Simulation driver and program loader.
pub mod sim;
/// Data memory.
pub mod soc;
/// Simulation statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Architectural state; holds the URF, memory, program and stats.
pub use crate::core::Cpu;
/// Driver API: initialize, cycle and inspect.
pub use crate::sim::Simulator;
