//! Per-opcode results through the whole pipeline.
//!
//! Every case runs `MOVC R1, a; MOVC R2, b; OP R3, R1, R2; HALT` and reads R3.

use crate::common::harness::TestContext;
use apexsim_core::common::RegisterName::General as R;
use apexsim_core::isa::{Instruction, Opcode};
use rstest::rstest;

fn run_binary(op: Opcode, a: i32, b: i32) -> i32 {
    let mut ctx = TestContext::new().load(&[
        Instruction::movc(R(1), a),
        Instruction::movc(R(2), b),
        Instruction::register(op, R(3), R(1), R(2)),
        Instruction::halt(),
    ]);
    let _ = ctx.run_to_halt();
    ctx.reg(3)
}

#[rstest]
#[case::add(Opcode::Add, 5, 10, 15)]
#[case::add_negative(Opcode::Add, -7, 3, -4)]
#[case::add_wraps(Opcode::Add, i32::MAX, 1, i32::MIN)]
#[case::sub(Opcode::Sub, 3, 10, -7)]
#[case::sub_wraps(Opcode::Sub, i32::MIN, 1, i32::MAX)]
#[case::mul(Opcode::Mul, 6, 7, 42)]
#[case::mul_negative(Opcode::Mul, -6, 7, -42)]
#[case::mul_wraps(Opcode::Mul, 65_536, 65_536, 0)]
#[case::and(Opcode::And, 0b1100, 0b1010, 0b1000)]
#[case::or(Opcode::Or, 0b1100, 0b1010, 0b1110)]
#[case::xor(Opcode::Xor, 0b1100, 0b1010, 0b0110)]
#[case::xor_self_is_zero(Opcode::Xor, -1, -1, 0)]
fn test_register_opcode_result(
    #[case] op: Opcode,
    #[case] a: i32,
    #[case] b: i32,
    #[case] expected: i32,
) {
    assert_eq!(run_binary(op, a, b), expected);
}

#[rstest]
#[case::bz_on_zero(Opcode::Bz, 0, true)]
#[case::bz_on_nonzero(Opcode::Bz, 4, false)]
#[case::bnz_on_zero(Opcode::Bnz, 0, false)]
#[case::bnz_on_negative(Opcode::Bnz, -1, true)]
fn test_conditional_branch(#[case] op: Opcode, #[case] condition: i32, #[case] taken: bool) {
    let branch = match op {
        Opcode::Bz => Instruction::bz(8),
        _ => Instruction::bnz(8),
    };
    let mut ctx = TestContext::new().load(&[
        Instruction::movc(R(0), condition),
        branch,
        Instruction::movc(R(1), 1),
        Instruction::halt(),
    ]);
    let _ = ctx.run_to_halt();
    assert_eq!(ctx.reg(1), i32::from(!taken));
    assert_eq!(ctx.sim.stats().taken_branches, u64::from(taken));
}

#[rstest]
#[case::same_source_and_destination("MOVC R1, #4\nADD R1, R1, R1\nHALT", 1, 8)]
#[case::chained_dependency("MOVC R1, #2\nMUL R2, R1, R1\nMUL R3, R2, R2\nHALT", 3, 16)]
#[case::write_after_write("MOVC R1, #1\nMOVC R1, #2\nMOVC R1, #3\nHALT", 1, 3)]
#[case::ex_or_alias("MOVC R1, #5\nMOVC R2, #3\nEX-OR R4, R1, R2\nHALT", 4, 6)]
fn test_dependency_chain(#[case] asm: &str, #[case] reg: usize, #[case] expected: i32) {
    let mut ctx = TestContext::new().load_asm(asm);
    let _ = ctx.run_to_halt();
    assert_eq!(ctx.reg(reg), expected);
}
