//! Program and renamed instruction records.
//!
//! This module defines the two forms an instruction takes in the simulator. It provides:
//! 1. **Program Instructions:** Immutable, program-order records naming architectural registers.
//! 2. **Decoded Instructions:** The renamed form carrying physical-register operands.
//! 3. **Shape Checks:** Validation of operands against the opcode table.
//! 4. **Display:** Assembly-style formatting used by tracing and the console.

use std::fmt;

use crate::common::reg::{PhysReg, RegisterName};
use crate::isa::opcode::Opcode;

/// An instruction as loaded from the program.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Instruction {
    /// Operation.
    pub opcode: Opcode,
    /// Destination register, if the opcode writes one.
    pub rd: Option<RegisterName>,
    /// First source register.
    pub rs1: Option<RegisterName>,
    /// Second source register.
    pub rs2: Option<RegisterName>,
    /// Literal operand (zero when the opcode has none).
    pub literal: i32,
}

impl Instruction {
    const fn new(
        opcode: Opcode,
        rd: Option<RegisterName>,
        rs1: Option<RegisterName>,
        rs2: Option<RegisterName>,
        literal: i32,
    ) -> Self {
        Self {
            opcode,
            rd,
            rs1,
            rs2,
            literal,
        }
    }

    /// Builds a three-register instruction (`ADD`, `SUB`, `MUL`, `AND`, `OR`, `XOR`).
    pub const fn register(
        opcode: Opcode,
        rd: RegisterName,
        rs1: RegisterName,
        rs2: RegisterName,
    ) -> Self {
        Self::new(opcode, Some(rd), Some(rs1), Some(rs2), 0)
    }

    /// `MOVC rd, #literal`
    pub const fn movc(rd: RegisterName, literal: i32) -> Self {
        Self::new(Opcode::Movc, Some(rd), None, None, literal)
    }

    /// `LOAD rd, rs1, #literal`
    pub const fn load(rd: RegisterName, rs1: RegisterName, literal: i32) -> Self {
        Self::new(Opcode::Load, Some(rd), Some(rs1), None, literal)
    }

    /// `STORE rs1, rs2, #literal`: writes `rs1` to `rs2 + literal`.
    pub const fn store(rs1: RegisterName, rs2: RegisterName, literal: i32) -> Self {
        Self::new(Opcode::Store, None, Some(rs1), Some(rs2), literal)
    }

    /// `BZ #literal`
    pub const fn bz(literal: i32) -> Self {
        Self::new(Opcode::Bz, None, None, None, literal)
    }

    /// `BNZ #literal`
    pub const fn bnz(literal: i32) -> Self {
        Self::new(Opcode::Bnz, None, None, None, literal)
    }

    /// `JUMP rs1, #literal`
    pub const fn jump(rs1: RegisterName, literal: i32) -> Self {
        Self::new(Opcode::Jump, None, Some(rs1), None, literal)
    }

    /// `BAL rs1, #literal`; the return address goes to `X`.
    pub const fn bal(rs1: RegisterName, literal: i32) -> Self {
        Self::new(Opcode::Bal, Some(RegisterName::Link), Some(rs1), None, literal)
    }

    /// `HALT`
    pub const fn halt() -> Self {
        Self::new(Opcode::Halt, None, None, None, 0)
    }

    /// Checks the register operands against the opcode's declared shape.
    ///
    /// # Returns
    ///
    /// `Ok(())` when every required register is present and no extra one is, or a
    /// short description of the mismatch.
    pub fn check_shape(&self) -> Result<(), &'static str> {
        let info = self.opcode.info();
        let named_sources = if info.reads_condition { 0 } else { info.sources };
        if self.rd.is_some() != (info.destinations == 1) {
            return Err(if self.rd.is_some() {
                "unexpected destination register"
            } else {
                "missing destination register"
            });
        }
        if self.rs1.is_some() != (named_sources >= 1) {
            return Err(if self.rs1.is_some() {
                "unexpected first source register"
            } else {
                "missing first source register"
            });
        }
        if self.rs2.is_some() != (named_sources == 2) {
            return Err(if self.rs2.is_some() {
                "unexpected second source register"
            } else {
                "missing second source register"
            });
        }
        Ok(())
    }

    /// Iterates over every register the instruction names.
    pub fn registers(&self) -> impl Iterator<Item = RegisterName> {
        [self.rd, self.rs1, self.rs2].into_iter().flatten()
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // BAL's destination is always X and is not written in assembly.
        let rd = if self.opcode == Opcode::Bal { None } else { self.rd };
        let regs = [rd, self.rs1, self.rs2];
        write_operands(f, self.opcode, regs.iter().flatten(), self.literal)
    }
}

/// An instruction after renaming: physical registers replace architectural names.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodedInstruction {
    /// Operation.
    pub opcode: Opcode,
    /// Allocated destination register.
    pub dest: Option<PhysReg>,
    /// First source register (for `BZ`/`BNZ`, the pending condition producer).
    pub src1: Option<PhysReg>,
    /// Second source register.
    pub src2: Option<PhysReg>,
    /// Literal operand.
    pub literal: i32,
}

impl fmt::Display for DecodedInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let regs = [self.dest, self.src1, self.src2];
        write_operands(f, self.opcode, regs.iter().flatten(), self.literal)
    }
}

fn write_operands<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    opcode: Opcode,
    regs: impl Iterator<Item = T>,
    literal: i32,
) -> fmt::Result {
    write!(f, "{opcode}")?;
    let mut sep = " ";
    for reg in regs {
        write!(f, "{sep}{reg}")?;
        sep = ", ";
    }
    if opcode.info().literals > 0 {
        write!(f, "{sep}#{literal}")?;
    }
    Ok(())
}
