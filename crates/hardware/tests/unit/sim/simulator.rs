//! Initialize, cycle and the inspection views.

use crate::common::harness::TestContext;
use apexsim_core::Simulator;
use apexsim_core::common::error::SimError;
use apexsim_core::common::reg::PhysReg;
use apexsim_core::common::reg::RegisterName::{General as R, Link};
use apexsim_core::config::Config;
use apexsim_core::isa::instruction::Instruction;
use pretty_assertions::assert_eq;

const PROGRAM: &str = "MOVC R1, #6
MOVC R2, #7
MUL R3, R1, R2
STORE R3, R0, #12
HALT";

// ══════════════════════════════════════════════════════════
// Initialize
// ══════════════════════════════════════════════════════════

#[test]
fn test_initialize_resets_every_structure() {
    let mut ctx = TestContext::new().load_asm(PROGRAM);
    let _ = ctx.run_to_halt();
    assert_eq!(ctx.mem(12), 42);

    let program = apexsim_core::sim::loader::parse_program(PROGRAM).unwrap();
    ctx.sim.initialize(program).unwrap();
    assert_eq!(ctx.sim.stats().cycles, 0);
    assert_eq!(ctx.sim.pc(), 4000);
    assert!(!ctx.sim.is_halted());
    assert_eq!(ctx.mem(12), 0);
    assert_eq!(ctx.sim.rob_entries().count(), 0);
    assert_eq!(ctx.sim.issue_queue().count(), 0);
    assert_eq!(ctx.sim.rat(), ctx.sim.rrat());
    assert_eq!(ctx.sim.register_value(R(3)), Some(0));
}

#[test]
fn test_initialize_rejects_registers_the_machine_lacks() {
    let mut config = Config::default();
    config.core.arch_registers = 8;
    config.core.physical_registers = 16;
    let mut sim = Simulator::new(config).unwrap();

    let err = sim.initialize(vec![Instruction::movc(R(7), 1), Instruction::movc(R(8), 2)]);
    assert!(
        matches!(err, Err(SimError::InvalidProgram { index: 1, .. })),
        "{err:?}"
    );
    assert_eq!(sim.register_value(R(8)), None);
    assert_eq!(sim.arch_name(8), Link);
}

#[test]
fn test_program_without_halt_runs_off_the_end() {
    let mut ctx = TestContext::new().load_asm("MOVC R1, #1\nMOVC R2, #2");
    assert!(!ctx.sim.cycle(50).unwrap());
    assert_eq!(ctx.reg(1), 1);
    assert_eq!(ctx.reg(2), 2);
    assert!(ctx.sim.pipeline.is_empty());
}

// ══════════════════════════════════════════════════════════
// Cycling
// ══════════════════════════════════════════════════════════

#[test]
fn test_cycling_in_steps_matches_one_long_run() {
    let mut whole = TestContext::new().load_asm(PROGRAM);
    let cycles = whole.run_to_halt();

    let mut stepped = TestContext::new().load_asm(PROGRAM);
    let mut steps = 0;
    while !stepped.sim.cycle(3).unwrap() {
        steps += 1;
        assert!(steps < 100);
    }
    assert_eq!(stepped.sim.stats().cycles, cycles);
    assert_eq!(stepped.reg(3), whole.reg(3));
    assert_eq!(stepped.mem(12), whole.mem(12));
}

#[test]
fn test_set_physical_registers_discards_the_program() {
    let mut ctx = TestContext::new().load_asm(PROGRAM);
    let _ = ctx.sim.cycle(4).unwrap();

    ctx.sim.set_physical_registers(20).unwrap();
    assert_eq!(ctx.sim.physical_registers().count(), 20);
    assert_eq!(ctx.sim.config().core.physical_registers, 20);
    assert!(!ctx.sim.cycle(10).unwrap());

    assert!(matches!(
        ctx.sim.set_physical_registers(4),
        Err(SimError::Config(_))
    ));
}

// ══════════════════════════════════════════════════════════
// Inspection
// ══════════════════════════════════════════════════════════

#[test]
fn test_reset_maps_each_register_to_its_own_index() {
    let ctx = TestContext::new().load_asm(PROGRAM);
    let identity: Vec<PhysReg> = (0..17).map(PhysReg).collect();
    assert_eq!(ctx.sim.rat(), identity.as_slice());
    assert_eq!(ctx.sim.rrat(), identity.as_slice());

    let allocated = ctx
        .sim
        .physical_registers()
        .filter(|&(_, _, allocated)| allocated)
        .count();
    assert_eq!(allocated, 17);
    assert_eq!(ctx.sim.arch_name(16), Link);
    assert_eq!(ctx.sim.arch_name(3), R(3));
}

#[test]
fn test_in_flight_state_is_visible_mid_run() {
    let mut ctx = TestContext::new().load_asm(PROGRAM);
    let _ = ctx.sim.cycle(5).unwrap();

    assert!(ctx.sim.rob_entries().count() > 0);
    assert_ne!(ctx.sim.rat(), ctx.sim.rrat());
    let display = ctx.sim.to_string();
    assert!(display.contains("cycle 5"), "{display}");
}

#[test]
fn test_memory_range_lists_words() {
    let mut ctx = TestContext::new().load_asm(PROGRAM);
    let _ = ctx.run_to_halt();

    let words = ctx.sim.memory_range(8, 16).unwrap();
    assert_eq!(words, vec![(8, 0), (12, 42), (16, 0)]);
    assert_eq!(ctx.sim.recent_writes().collect::<Vec<_>>(), vec![12]);
    assert!(ctx.sim.memory_range(0, 4002).is_err());
}
