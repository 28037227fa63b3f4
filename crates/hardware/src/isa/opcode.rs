//! Opcode definitions and metadata table.
//!
//! Every per-opcode property the pipeline needs lives in one table row so that the
//! rename, issue and execute stages never re-derive behavior from the opcode. It provides:
//! 1. **Opcodes:** The fourteen APEX instructions.
//! 2. **Operand Shape:** Declared destination, source and literal counts.
//! 3. **Routing:** Functional-unit class and the ALU, memory or branch operation to apply.

use std::fmt;

use crate::core::pipeline::signals::{AluOp, BranchOp, FuClass, MemOp};

/// APEX opcodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// `ADD rd, rs1, rs2`
    Add,
    /// `SUB rd, rs1, rs2`
    Sub,
    /// `MUL rd, rs1, rs2`
    Mul,
    /// `AND rd, rs1, rs2`
    And,
    /// `OR rd, rs1, rs2`
    Or,
    /// `XOR rd, rs1, rs2` (also written `EX-OR`)
    Xor,
    /// `MOVC rd, #lit`
    Movc,
    /// `LOAD rd, rs1, #lit`
    Load,
    /// `STORE rs1, rs2, #lit`
    Store,
    /// `BZ #lit`
    Bz,
    /// `BNZ #lit`
    Bnz,
    /// `JUMP rs1, #lit`
    Jump,
    /// `BAL rs1, #lit`
    Bal,
    /// `HALT`
    Halt,
}

/// Static properties of one opcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OpcodeInfo {
    /// Assembly mnemonic.
    pub mnemonic: &'static str,
    /// Number of destination registers (0 or 1).
    pub destinations: u8,
    /// Number of value operands that must be ready before issue (0, 1 or 2).
    pub sources: u8,
    /// Number of literal operands (0 or 1).
    pub literals: u8,
    /// Functional-unit class.
    pub class: FuClass,
    /// ALU function for ALU and MUL class instructions.
    pub alu: AluOp,
    /// Memory access, for the load/store class.
    pub mem: Option<MemOp>,
    /// Branch rule, for the branch class.
    pub branch: Option<BranchOp>,
    /// Result becomes the branch condition (arithmetic instructions).
    pub sets_condition: bool,
    /// The single source is the implicit branch condition rather than a named register.
    pub reads_condition: bool,
}

const fn arith(mnemonic: &'static str, class: FuClass, alu: AluOp) -> OpcodeInfo {
    OpcodeInfo {
        mnemonic,
        destinations: 1,
        sources: 2,
        literals: 0,
        class,
        alu,
        mem: None,
        branch: None,
        sets_condition: true,
        reads_condition: false,
    }
}

const fn control(mnemonic: &'static str, destinations: u8, op: BranchOp) -> OpcodeInfo {
    OpcodeInfo {
        mnemonic,
        destinations,
        sources: 1,
        literals: 1,
        class: FuClass::Branch,
        alu: AluOp::Add,
        mem: None,
        branch: Some(op),
        sets_condition: false,
        reads_condition: matches!(op, BranchOp::IfZero | BranchOp::IfNonZero),
    }
}

const fn memory(mnemonic: &'static str, destinations: u8, sources: u8, op: MemOp) -> OpcodeInfo {
    OpcodeInfo {
        mnemonic,
        destinations,
        sources,
        literals: 1,
        class: FuClass::LoadStore,
        alu: AluOp::Add,
        mem: Some(op),
        branch: None,
        sets_condition: false,
        reads_condition: false,
    }
}

/// Opcode table, indexed by `Opcode as usize`.
static TABLE: [OpcodeInfo; 14] = [
    arith("ADD", FuClass::Alu, AluOp::Add),
    arith("SUB", FuClass::Alu, AluOp::Sub),
    arith("MUL", FuClass::Mul, AluOp::Mul),
    arith("AND", FuClass::Alu, AluOp::And),
    arith("OR", FuClass::Alu, AluOp::Or),
    arith("XOR", FuClass::Alu, AluOp::Xor),
    OpcodeInfo {
        mnemonic: "MOVC",
        destinations: 1,
        sources: 0,
        literals: 1,
        class: FuClass::Alu,
        alu: AluOp::Add,
        mem: None,
        branch: None,
        sets_condition: true,
        reads_condition: false,
    },
    memory("LOAD", 1, 1, MemOp::Load),
    memory("STORE", 0, 2, MemOp::Store),
    control("BZ", 0, BranchOp::IfZero),
    control("BNZ", 0, BranchOp::IfNonZero),
    control("JUMP", 0, BranchOp::Jump),
    control("BAL", 1, BranchOp::JumpAndLink),
    OpcodeInfo {
        mnemonic: "HALT",
        destinations: 0,
        sources: 0,
        literals: 0,
        class: FuClass::Alu,
        alu: AluOp::Nop,
        mem: None,
        branch: None,
        sets_condition: false,
        reads_condition: false,
    },
];

impl Opcode {
    /// Every opcode, in table order.
    pub const ALL: [Self; 14] = [
        Self::Add,
        Self::Sub,
        Self::Mul,
        Self::And,
        Self::Or,
        Self::Xor,
        Self::Movc,
        Self::Load,
        Self::Store,
        Self::Bz,
        Self::Bnz,
        Self::Jump,
        Self::Bal,
        Self::Halt,
    ];

    /// Returns the metadata row for this opcode.
    #[inline(always)]
    pub fn info(self) -> &'static OpcodeInfo {
        &TABLE[self as usize]
    }

    /// Looks up an opcode by assembly mnemonic.
    ///
    /// Accepts `EX-OR` as a spelling of `XOR`.
    pub fn from_mnemonic(mnemonic: &str) -> Option<Self> {
        if mnemonic == "EX-OR" {
            return Some(Self::Xor);
        }
        Self::ALL.into_iter().find(|op| op.info().mnemonic == mnemonic)
    }

    /// Returns true for `LOAD`.
    pub fn is_load(self) -> bool {
        self.info().mem == Some(MemOp::Load)
    }

    /// Returns true for `STORE`.
    pub fn is_store(self) -> bool {
        self.info().mem == Some(MemOp::Store)
    }

    /// Returns true for any instruction handled by the branch unit.
    pub fn is_branch(self) -> bool {
        self.info().class == FuClass::Branch
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.info().mnemonic)
    }
}
