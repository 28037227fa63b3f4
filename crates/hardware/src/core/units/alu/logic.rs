//! ALU logical operations.
//!
//! Implements bitwise AND, OR and XOR.

use crate::core::pipeline::signals::AluOp;

/// Executes a bitwise operation.
///
/// # Returns
///
/// The 32-bit result. Returns `0` for non-logic opcodes.
pub const fn execute(op: AluOp, a: i32, b: i32) -> i32 {
    match op {
        AluOp::And => a & b,
        AluOp::Or => a | b,
        AluOp::Xor => a ^ b,
        _ => 0,
    }
}
