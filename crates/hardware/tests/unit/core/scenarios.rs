//! End-to-end program scenarios.
//!
//! Each test loads a short program, cycles until HALT, and checks committed
//! registers, memory and the rename tables.

use crate::common::harness::TestContext;
use apexsim_core::common::{Fault, RegisterName::General as R, SimError};
use apexsim_core::isa::{Instruction, Opcode};
use pretty_assertions::assert_eq;

// ══════════════════════════════════════════════════════════
// Straight-line programs
// ══════════════════════════════════════════════════════════

#[test]
fn test_movc_commits_to_architectural_register() {
    let mut ctx = TestContext::new().load(&[Instruction::movc(R(1), 5), Instruction::halt()]);
    let _ = ctx.run_to_halt();
    assert_eq!(ctx.reg(1), 5);
    assert!(ctx.sim.is_halted());
}

#[test]
fn test_store_of_sum_to_zero_base() {
    // R3 is never written, so it holds 0 from reset.
    let mut ctx = TestContext::new().load(&[
        Instruction::movc(R(0), 5),
        Instruction::movc(R(1), 10),
        Instruction::register(Opcode::Add, R(2), R(0), R(1)),
        Instruction::store(R(2), R(3), 0),
        Instruction::halt(),
    ]);
    let _ = ctx.run_to_halt();
    assert_eq!(ctx.mem(0), 15);
    assert_eq!(ctx.reg(2), 15);
    assert_eq!(ctx.sim.stats().inst_store, 1);
}

#[test]
fn test_store_to_unaligned_address_is_fatal() {
    // STORE R2, R0, #0 addresses R0 = 5, which is not a word address.
    let mut ctx = TestContext::new().load(&[
        Instruction::movc(R(0), 5),
        Instruction::movc(R(1), 10),
        Instruction::register(Opcode::Add, R(2), R(0), R(1)),
        Instruction::store(R(2), R(0), 0),
        Instruction::halt(),
    ]);
    let err = ctx.try_run_to_halt().unwrap_err();
    assert!(matches!(err, SimError::Fault(Fault::UnalignedAddress { addr: 5 })));
    assert!(!ctx.sim.is_halted());

    // The fault is sticky.
    let cycles = ctx.sim.stats().cycles;
    assert!(matches!(
        ctx.sim.cycle(10),
        Err(SimError::Fault(Fault::UnalignedAddress { addr: 5 }))
    ));
    assert_eq!(ctx.sim.stats().cycles, cycles);
}

#[test]
fn test_load_reads_back_stored_value() {
    let mut ctx = TestContext::new().load_asm(
        "MOVC R0, #42
         MOVC R1, #100
         STORE R0, R1, #8
         LOAD R4, R1, #8
         STORE R4, R1, #12
         HALT",
    );
    let _ = ctx.run_to_halt();
    assert_eq!(ctx.reg(4), 42);
    assert_eq!(ctx.mem(108), 42);
    assert_eq!(ctx.mem(112), 42);
    assert_eq!(ctx.sim.stats().inst_load, 1);
}

#[test]
fn test_multiply_result_stored() {
    let mut ctx = TestContext::new().load_asm(
        "MOVC R0, #6
         MOVC R1, #7
         MUL R2, R0, R1
         STORE R2, R3, #8
         HALT",
    );
    let _ = ctx.run_to_halt();
    assert_eq!(ctx.reg(2), 42);
    assert_eq!(ctx.mem(8), 42);
}

// ══════════════════════════════════════════════════════════
// Branches
// ══════════════════════════════════════════════════════════

#[test]
fn test_bnz_not_taken_falls_through() {
    let mut ctx = TestContext::new().load(&[
        Instruction::movc(R(0), 0),
        Instruction::bnz(8),
        Instruction::movc(R(1), 1),
        Instruction::halt(),
    ]);
    let committed = ctx.run_recording_commits();
    assert_eq!(committed, vec![4000, 4004, 4008, 4012]);
    assert_eq!(ctx.reg(1), 1);
    assert_eq!(ctx.sim.stats().taken_branches, 0);
}

#[test]
fn test_bnz_taken_squashes_fall_through() {
    let mut ctx = TestContext::new().load(&[
        Instruction::movc(R(0), 7),
        Instruction::bnz(8),
        Instruction::movc(R(1), 1),
        Instruction::halt(),
    ]);
    let committed = ctx.run_recording_commits();
    assert_eq!(committed, vec![4000, 4004, 4012]);
    assert_eq!(ctx.reg(1), 0);
    assert_eq!(ctx.sim.stats().taken_branches, 1);
    assert!(ctx.sim.stats().squashed_instructions >= 1);

    // Nothing the squashed MOVC wrote survives in the register file.
    let stale = ctx
        .sim
        .physical_registers()
        .filter(|(_, cell, allocated)| !allocated && cell.value != 0)
        .count();
    assert_eq!(stale, 0);
    ctx.assert_conservation();
}

#[test]
fn test_bz_reads_latest_arithmetic_result() {
    // The SUB result (0) decides the branch, not the earlier MOVC (3).
    let mut ctx = TestContext::new().load_asm(
        "MOVC R0, #3
         SUB R1, R0, R0
         BZ #8
         MOVC R2, #1
         MOVC R3, #2
         HALT",
    );
    let _ = ctx.run_to_halt();
    assert_eq!(ctx.reg(2), 0);
    assert_eq!(ctx.reg(3), 2);
}

#[test]
fn test_backward_branch_loop() {
    let mut ctx = TestContext::new().load_asm(
        "MOVC R0, #3
         MOVC R1, #0
         MOVC R2, #1
         ADD R1, R1, R0
         SUB R0, R0, R2
         BNZ #-8
         HALT",
    );
    let _ = ctx.run_to_halt();
    assert_eq!(ctx.reg(1), 6);
    assert_eq!(ctx.reg(0), 0);
    assert_eq!(ctx.sim.stats().taken_branches, 2);
    assert_eq!(ctx.sim.rat(), ctx.sim.rrat());
}

#[test]
fn test_bal_and_jump_through_link_register() {
    let mut ctx = TestContext::new().load_asm(
        "MOVC R0, #4016
         BAL R0, #0
         MOVC R5, #9
         HALT
         MOVC R6, #3
         JUMP X, #0",
    );
    let committed = ctx.run_recording_commits();
    assert_eq!(committed, vec![4000, 4004, 4016, 4020, 4008, 4012]);
    assert_eq!(ctx.link(), 4008);
    assert_eq!(ctx.reg(5), 9);
    assert_eq!(ctx.reg(6), 3);
}

#[test]
fn test_store_behind_taken_branch_never_writes() {
    let mut ctx = TestContext::new().load_asm(
        "MOVC R0, #1
         MOVC R1, #99
         BNZ #8
         STORE R1, R2, #0
         HALT",
    );
    let _ = ctx.run_to_halt();
    assert_eq!(ctx.mem(0), 0);
    assert_eq!(ctx.sim.recent_writes().count(), 0);
}

#[test]
fn test_squash_releases_every_discarded_destination() {
    // The MUL holds the branch in the issue queue while the wrong path renames,
    // dispatches and partly executes.
    let mut ctx = TestContext::new().load_asm(
        "MOVC R0, #1
         MUL R6, R0, R0
         BNZ #24
         MOVC R1, #9
         MOVC R2, #9
         MOVC R3, #9
         MUL R4, R1, R2
         ADD R5, R3, R4
         HALT",
    );
    let _ = ctx.run_to_halt();

    for n in 1..=5 {
        assert_eq!(ctx.reg(n), 0, "R{n}");
    }
    assert_eq!(ctx.reg(6), 1);
    assert_eq!(ctx.sim.stats().taken_branches, 1);
    assert!(ctx.sim.stats().squashed_instructions >= 3);
    assert_eq!(ctx.sim.rat(), ctx.sim.rrat());
    assert_eq!(ctx.sim.free_registers(), 32 - 17);
}

#[test]
fn test_jump_below_code_base_faults() {
    let mut ctx = TestContext::new().load_asm(
        "MOVC R0, #8
         JUMP R0, #0
         HALT",
    );
    let err = ctx.try_run_to_halt().unwrap_err();
    assert!(matches!(
        err,
        SimError::Fault(Fault::InvalidFetchAddress { pc: 8 })
    ));
    assert_eq!(ctx.sim.fault(), Some(&Fault::InvalidFetchAddress { pc: 8 }));
}

#[test]
fn test_reinitialize_clears_fault_and_state() {
    let mut ctx = TestContext::new().load_asm("MOVC R0, #8\nJUMP R0, #0\nHALT");
    assert!(ctx.try_run_to_halt().is_err());

    let mut ctx = ctx.load_asm("MOVC R1, #2\nHALT");
    assert!(ctx.sim.fault().is_none());
    let _ = ctx.run_to_halt();
    assert_eq!(ctx.reg(0), 0);
    assert_eq!(ctx.reg(1), 2);
}
