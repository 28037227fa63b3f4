//! Pipeline latch structures for inter-stage communication.
//!
//! This module defines the entry types carried between stages:
//! Fetch → Decode-1 (rename) → Decode-2 (dispatch) → Issue Queue → functional unit.
//!
//! 1. **Source Operands:** Captured value plus valid bit for each input.
//! 2. **Front-end Latches:** Fetched and renamed instructions awaiting the next stage.
//! 3. **Unit Latches:** Issued instructions and their results inside a functional unit.

use crate::common::reg::{ArchReg, PhysReg};
use crate::core::pipeline::rob::RobTag;
use crate::isa::instruction::{DecodedInstruction, Instruction};

/// One input operand of a renamed instruction.
///
/// `reg` names the producer when the value is not yet captured. An operand the opcode
/// does not use is permanently valid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SourceOperand {
    /// Physical register the value comes from, if any.
    pub reg: Option<PhysReg>,
    /// Captured value (meaningful only when `valid`).
    pub value: i32,
    /// Set once the value has been captured.
    pub valid: bool,
}

impl SourceOperand {
    /// An operand slot the instruction does not read.
    pub const fn unused() -> Self {
        Self {
            reg: None,
            value: 0,
            valid: true,
        }
    }

    /// An operand waiting on `reg`.
    pub const fn pending(reg: PhysReg) -> Self {
        Self {
            reg: Some(reg),
            value: 0,
            valid: false,
        }
    }

    /// An operand whose value is already known.
    pub const fn ready(value: i32) -> Self {
        Self {
            reg: None,
            value,
            valid: true,
        }
    }

    /// Returns true if the operand is still waiting on `reg`.
    #[inline]
    pub fn waits_on(&self, reg: PhysReg) -> bool {
        !self.valid && self.reg == Some(reg)
    }

    /// Captures a value broadcast by `reg`, if this operand waits on it.
    ///
    /// # Returns
    ///
    /// `true` if the value was captured.
    #[inline]
    pub fn capture(&mut self, reg: PhysReg, value: i32) -> bool {
        if self.waits_on(reg) {
            self.value = value;
            self.valid = true;
            true
        } else {
            false
        }
    }
}

/// Entry in the fetch latch (Fetch to Decode-1).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetchEntry {
    /// Fetch address.
    pub pc: u32,
    /// Program instruction.
    pub inst: Instruction,
}

/// Entry in the rename latch (Decode-1 to Decode-2).
///
/// The destination register is already allocated and mapped in the RAT.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenameEntry {
    /// Fetch address.
    pub pc: u32,
    /// Program instruction.
    pub inst: Instruction,
    /// Renamed form.
    pub decoded: DecodedInstruction,
    /// Architectural destination, committed at retire.
    pub arch_dest: Option<ArchReg>,
    /// First source operand.
    pub src1: SourceOperand,
    /// Second source operand.
    pub src2: SourceOperand,
}

/// An instruction occupying a functional-unit stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExecEntry {
    /// Fetch address.
    pub pc: u32,
    /// Renamed form.
    pub decoded: DecodedInstruction,
    /// First source operand.
    pub src1: SourceOperand,
    /// Second source operand.
    pub src2: SourceOperand,
    /// Paired reorder-buffer entry.
    pub rob_tag: RobTag,
    /// Stage output: ALU result, effective address, loaded value or link address.
    pub result: i32,
}

impl ExecEntry {
    /// Captures a forwarded value into any operand still waiting on `reg`.
    pub fn capture(&mut self, reg: PhysReg, value: i32) {
        let _ = self.src1.capture(reg, value);
        let _ = self.src2.capture(reg, value);
    }
}

impl RenameEntry {
    /// Captures a value into any operand still waiting on `reg`.
    pub fn capture(&mut self, reg: PhysReg, value: i32) {
        let _ = self.src1.capture(reg, value);
        let _ = self.src2.capture(reg, value);
    }
}
