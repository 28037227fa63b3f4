//! Branch Resolution Unit (BRU).
//!
//! Evaluates control-flow instructions. There is no prediction: fetch always falls
//! through, and a taken outcome is acted on when the branch retires.

use crate::core::pipeline::signals::{AluOp, BranchOp};
use crate::core::units::alu::Alu;

/// Result of evaluating a branch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BranchOutcome {
    /// Control leaves the fall-through path.
    pub taken: bool,
    /// Destination address when taken.
    pub target: i32,
    /// Return address written to the destination register (`BAL`).
    pub link: Option<i32>,
}

/// Branch Resolution Unit.
#[derive(Debug)]
pub struct Bru;

impl Bru {
    /// Resolves a branch.
    ///
    /// # Arguments
    ///
    /// * `op`      - Branch rule.
    /// * `pc`      - Fetch address of the branch.
    /// * `operand` - The condition value (`BZ`/`BNZ`) or base register (`JUMP`/`BAL`).
    /// * `literal` - Offset added to the PC or base.
    ///
    /// # Returns
    ///
    /// Whether the branch is taken, its target, and the link value if any.
    pub fn resolve(op: BranchOp, pc: u32, operand: i32, literal: i32) -> BranchOutcome {
        let pc = pc as i32;
        match op {
            BranchOp::IfZero | BranchOp::IfNonZero => BranchOutcome {
                taken: (operand == 0) == (op == BranchOp::IfZero),
                target: Alu::execute(AluOp::Add, pc, literal),
                link: None,
            },
            BranchOp::Jump => BranchOutcome {
                taken: true,
                target: Alu::execute(AluOp::Add, operand, literal),
                link: None,
            },
            BranchOp::JumpAndLink => BranchOutcome {
                taken: true,
                target: Alu::execute(AluOp::Add, operand, literal),
                link: Some(Alu::execute(AluOp::Add, pc, 4)),
            },
        }
    }
}
