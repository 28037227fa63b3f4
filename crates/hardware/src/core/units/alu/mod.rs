//! Arithmetic Logic Unit (ALU).
//!
//! This module implements the integer functions shared by the ALU, the multiplier
//! and the load/store address stage. All arithmetic is 32-bit two's complement and wraps.
//!
//! Operations are organized into submodules by category:
//! - [`arithmetic`]: Add, Sub, Mul
//! - [`logic`]:      And, Or, Xor

/// Integer arithmetic operations (add, subtract, multiply).
pub mod arithmetic;

/// Bitwise logical operations (and, or, xor).
pub mod logic;

use crate::core::pipeline::signals::AluOp;

/// Arithmetic Logic Unit (ALU) for integer operations.
#[derive(Debug)]
pub struct Alu;

impl Alu {
    /// Executes an integer ALU operation.
    ///
    /// # Arguments
    ///
    /// * `op` - The ALU operation to perform
    /// * `a`  - First operand
    /// * `b`  - Second operand (a register value or the literal)
    ///
    /// # Returns
    ///
    /// The 32-bit result; `Nop` yields 0.
    ///
    /// # Examples
    ///
    /// ```
    /// use apexsim_core::core::units::alu::Alu;
    /// use apexsim_core::core::pipeline::signals::AluOp;
    ///
    /// assert_eq!(Alu::execute(AluOp::Add, 5, 10), 15);
    /// assert_eq!(Alu::execute(AluOp::Sub, 3, 5), -2);
    /// assert_eq!(Alu::execute(AluOp::Add, i32::MAX, 1), i32::MIN);
    /// assert_eq!(Alu::execute(AluOp::Xor, 0b1100, 0b1010), 0b0110);
    /// ```
    pub fn execute(op: AluOp, a: i32, b: i32) -> i32 {
        match op {
            AluOp::Add | AluOp::Sub | AluOp::Mul => arithmetic::execute(op, a, b),
            AluOp::And | AluOp::Or | AluOp::Xor => logic::execute(op, a, b),
            AluOp::Nop => 0,
        }
    }
}
