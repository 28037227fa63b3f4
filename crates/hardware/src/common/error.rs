//! Fault, backpressure and input error definitions.
//!
//! This module defines the error handling for the simulator. It provides:
//! 1. **Faults:** Fatal invariant violations that abort a run (bad addresses, queue misuse).
//! 2. **Backpressure:** A checked would-block status for exhausted resources; never fatal.
//! 3. **Input Errors:** Configuration and program text problems reported before simulation.
//! 4. **Driver Errors:** `SimError`, the union surfaced by the `Simulator` API.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal invariant violation inside the engine.
///
/// A fault means a scheduling or decode defect or an illegal memory access by the
/// simulated program. The run stops and the fault is reported instead of a HALT.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Fault {
    /// An entry was enqueued into a full issue queue.
    #[error("issue queue overflow (capacity {capacity})")]
    IssueQueueOverflow {
        /// Configured issue-queue capacity.
        capacity: usize,
    },

    /// An instruction was issued from an empty issue queue or a missing slot.
    #[error("issue from empty issue queue slot {index}")]
    IssueQueueUnderflow {
        /// Slot index that was requested.
        index: usize,
    },

    /// An entry was appended to a full reorder buffer.
    #[error("reorder buffer overflow (capacity {capacity})")]
    ReorderBufferOverflow {
        /// Configured reorder-buffer capacity.
        capacity: usize,
    },

    /// A decoded instruction does not match its opcode's operand shape.
    #[error("malformed instruction at {pc}: {reason}")]
    MalformedInstruction {
        /// Fetch address of the instruction.
        pc: u32,
        /// What was wrong.
        reason: &'static str,
    },

    /// A data memory address is not a multiple of 4.
    #[error("unaligned memory address {addr}")]
    UnalignedAddress {
        /// Effective address.
        addr: i32,
    },

    /// A data memory address is negative or past the end of memory.
    #[error("memory address {addr} out of range (size {size} bytes)")]
    AddressOutOfRange {
        /// Effective address.
        addr: i32,
        /// Configured memory size in bytes.
        size: usize,
    },

    /// The program counter left the code region (below the code base or unaligned).
    #[error("invalid fetch address {pc}")]
    InvalidFetchAddress {
        /// Offending program counter.
        pc: u32,
    },

    /// A STORE reached the memory stage without its data operand.
    #[error("store at {pc} reached memory without its data")]
    StoreDataUnavailable {
        /// Fetch address of the store.
        pc: u32,
    },
}

/// Resource-exhaustion status reported by the front end.
///
/// These are expected during normal execution: the stage holds its latch and retries
/// on the next cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum Backpressure {
    /// No free physical register for a destination.
    #[error("no free physical register")]
    RegisterExhausted,
    /// The issue queue has no free slot.
    #[error("issue queue full")]
    IssueQueueFull,
    /// The reorder buffer has no free slot.
    #[error("reorder buffer full")]
    ReorderBufferFull,
}

/// Invalid simulator configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A field has a value the engine cannot be built with.
    #[error("invalid configuration: {field} {reason}")]
    Invalid {
        /// Dotted field path, e.g. `core.physical_registers`.
        field: &'static str,
        /// Constraint that was violated.
        reason: String,
    },

    /// The configuration file could not be read.
    #[error("cannot read config {path}: {source}")]
    Io {
        /// Path that was opened.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration JSON is malformed.
    #[error("cannot parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Assembly text that cannot be turned into instructions.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The line matches no instruction grammar.
    #[error("line {line}: unrecognized instruction `{text}`")]
    UnrecognizedInstruction {
        /// 1-based line number.
        line: usize,
        /// Trimmed line text.
        text: String,
    },

    /// A register operand is not `R<n>` or `X`, or is not allowed in that position.
    #[error("line {line}: bad register `{token}`")]
    BadRegister {
        /// 1-based line number.
        line: usize,
        /// Offending token.
        token: String,
    },

    /// A literal operand is not `#<integer>`.
    #[error("line {line}: bad literal `{token}`")]
    BadLiteral {
        /// 1-based line number.
        line: usize,
        /// Offending token.
        token: String,
    },

    /// The program file could not be read.
    #[error("cannot read program {path}: {source}")]
    Io {
        /// Path that was opened.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Errors surfaced by the [`Simulator`](crate::sim::Simulator) driver API.
#[derive(Debug, Error)]
pub enum SimError {
    /// Fatal engine fault; the run is over.
    #[error("simulation fault: {0}")]
    Fault(#[from] Fault),

    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Program text could not be loaded.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// An instruction names a register the configured machine does not have,
    /// or lacks an operand its opcode requires.
    #[error("instruction {index} ({text}): {reason}")]
    InvalidProgram {
        /// Position of the instruction in the program.
        index: usize,
        /// Display form of the instruction.
        text: String,
        /// What was wrong.
        reason: String,
    },
}
