//! Register identifiers.
//!
//! This module defines strong types for the three ways a register is named in the
//! simulator so that architectural and physical indices can never be mixed up. It provides:
//! 1. **Register Names:** The textual `R<n>` / `X` operands carried by program instructions.
//! 2. **Architectural Indices:** Dense indices into the rename tables (`X` is the last one).
//! 3. **Physical Indices:** References into the physical register arena.

use std::fmt;
use std::str::FromStr;

/// A register operand as written in a program.
///
/// General registers are written `R<n>`; the implicit link register is written `X`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RegisterName {
    /// General-purpose register `R<n>`.
    General(usize),
    /// The link register `X`, written by `BAL` and readable by `JUMP`.
    Link,
}

impl RegisterName {
    /// Maps the name onto a dense architectural index.
    ///
    /// # Arguments
    ///
    /// * `arch_registers` - Number of general registers; `X` occupies this index.
    ///
    /// # Returns
    ///
    /// The architectural index, or `None` if a general register is out of range.
    pub const fn index(self, arch_registers: usize) -> Option<ArchReg> {
        match self {
            Self::General(n) if n < arch_registers => Some(ArchReg(n)),
            Self::General(_) => None,
            Self::Link => Some(ArchReg(arch_registers)),
        }
    }
}

impl fmt::Display for RegisterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::General(n) => write!(f, "R{n}"),
            Self::Link => f.write_str("X"),
        }
    }
}

/// Error returned when a token is not a register name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BadRegister(pub String);

impl FromStr for RegisterName {
    type Err = BadRegister;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "X" {
            return Ok(Self::Link);
        }
        s.strip_prefix('R')
            .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|digits| digits.parse().ok())
            .map(Self::General)
            .ok_or_else(|| BadRegister(s.to_owned()))
    }
}

/// Index of an architectural register in the rename tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ArchReg(pub usize);

/// Index of a physical register in the register pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct PhysReg(pub usize);

impl ArchReg {
    /// Returns the raw index.
    #[inline(always)]
    pub const fn val(self) -> usize {
        self.0
    }
}

impl PhysReg {
    /// Returns the raw index.
    #[inline(always)]
    pub const fn val(self) -> usize {
        self.0
    }
}

impl fmt::Display for PhysReg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}
