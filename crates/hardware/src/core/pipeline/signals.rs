//! Pipeline control signals and operation types.
//!
//! This module defines the signals that steer an instruction through the back end.
//! It performs:
//! 1. **Unit Routing:** Which functional-unit class executes the instruction.
//! 2. **Operation Selection:** The ALU function, memory access or branch rule to apply.

use std::fmt;

/// Functional-unit class an instruction is issued to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FuClass {
    /// Single-cycle integer unit (also carries `MOVC` and `HALT`).
    Alu,
    /// Multi-cycle multiplier; one operation in flight.
    Mul,
    /// Branch resolution unit.
    Branch,
    /// Two-stage load/store unit.
    LoadStore,
}

impl FuClass {
    /// All classes, in the order the issue stage polls them.
    pub const ALL: [Self; 4] = [Self::Alu, Self::Mul, Self::Branch, Self::LoadStore];
}

impl fmt::Display for FuClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Alu => "ALU",
            Self::Mul => "MUL",
            Self::Branch => "BRANCH",
            Self::LoadStore => "LSU",
        })
    }
}

/// ALU operation types.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AluOp {
    /// Wrapping addition (also `MOVC` as `0 + literal` and address generation).
    #[default]
    Add,

    /// Wrapping subtraction.
    Sub,

    /// Wrapping multiplication (low 32 bits).
    Mul,

    /// Bitwise AND.
    And,

    /// Bitwise OR.
    Or,

    /// Bitwise XOR.
    Xor,

    /// No computation; the result is zero.
    Nop,
}

/// Memory access performed in the load/store unit's memory stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemOp {
    /// Read the word at `src1 + literal` into the destination.
    Load,
    /// Write `src1` to the word at `src2 + literal`.
    Store,
}

/// Branch rule evaluated by the branch unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BranchOp {
    /// Taken to `pc + literal` when the condition operand is zero.
    IfZero,
    /// Taken to `pc + literal` when the condition operand is non-zero.
    IfNonZero,
    /// Always taken to `src1 + literal`.
    Jump,
    /// Always taken to `src1 + literal`; the destination receives `pc + 4`.
    JumpAndLink,
}
