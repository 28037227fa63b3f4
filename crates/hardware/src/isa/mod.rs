//! Instruction Set Architecture (ISA) Definitions.
//!
//! Contains the APEX opcode table, the instruction records that flow through the
//! pipeline, and the assembly text decoder.
//!
//! # Instructions
//!
//! * Arithmetic: `ADD`, `SUB`, `MUL`, `AND`, `OR`, `XOR`, `MOVC`.
//! * Memory: `LOAD`, `STORE`.
//! * Control: `BZ`, `BNZ`, `JUMP`, `BAL`, `HALT`.

/// Assembly text decoding.
pub mod decode;

/// Program-order and renamed instruction records.
pub mod instruction;

/// Opcode enumeration and per-opcode metadata.
pub mod opcode;

pub use instruction::{DecodedInstruction, Instruction};
pub use opcode::{Opcode, OpcodeInfo};
