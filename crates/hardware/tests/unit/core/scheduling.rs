//! Ordering, forwarding and backpressure.

use crate::common::harness::TestContext;
use apexsim_core::config::Config;
use pretty_assertions::assert_eq;

// ══════════════════════════════════════════════════════════
// Timing
// ══════════════════════════════════════════════════════════

#[test]
fn test_single_instruction_pipeline_depth() {
    // Fetch, rename, dispatch, issue/execute, writeback, commit; HALT one behind.
    let mut ctx = TestContext::new().load_asm("MOVC R1, #5\nHALT");
    assert_eq!(ctx.run_to_halt(), 7);
    assert_eq!(ctx.sim.stats().instructions_retired, 2);
    assert_eq!(ctx.sim.stats().no_issue_cycles, 4);
}

#[test]
fn test_independent_instruction_completes_before_older_multiply() {
    let mut config = Config::default();
    config.core.mul_latency = 4;
    let mut ctx = TestContext::with_config(config).load_asm(
        "MOVC R1, #3
         MUL R2, R1, R1
         MOVC R3, #4
         HALT",
    );

    let mut overtaken = false;
    while !ctx.sim.cycle(1).unwrap() {
        let mul = ctx.sim.rob_entries().find(|e| e.pc == 4004).copied();
        let movc = ctx.sim.rob_entries().find(|e| e.pc == 4008).copied();
        if let (Some(mul), Some(movc)) = (mul, movc) {
            overtaken |= movc.is_completed() && !mul.is_completed();
        }
        assert!(ctx.sim.stats().cycles < 100);
    }
    assert!(overtaken, "younger MOVC never completed ahead of the MUL");
    assert_eq!(ctx.reg(2), 9);
    assert_eq!(ctx.reg(3), 4);
}

#[test]
fn test_cycle_stops_at_halt() {
    let mut ctx = TestContext::new().load_asm("MOVC R1, #5\nHALT");
    assert!(ctx.sim.cycle(1_000).unwrap());
    assert_eq!(ctx.sim.stats().cycles, 7);
    assert!(ctx.sim.cycle(5).unwrap());
    assert_eq!(ctx.sim.stats().cycles, 7);
}

// ══════════════════════════════════════════════════════════
// Early store issue
// ══════════════════════════════════════════════════════════

/// Cycles to HALT and reports whether the instruction at `store_pc` left the issue
/// queue while the one at `producer_pc` was still incomplete in the ROB.
fn store_overtakes_producer(ctx: &mut TestContext, store_pc: u32, producer_pc: u32) -> bool {
    let mut overtaken = false;
    while !ctx.sim.cycle(1).unwrap() {
        let issued = ctx.sim.issue_queue().all(|e| e.pc != store_pc)
            && ctx.sim.rob_entries().any(|e| e.pc == store_pc);
        let pending = ctx
            .sim
            .rob_entries()
            .any(|e| e.pc == producer_pc && !e.is_completed());
        overtaken |= issued && pending;
        assert!(ctx.sim.stats().cycles < 100);
    }
    overtaken
}

#[test]
fn test_store_issues_as_multiply_delivers_its_data() {
    let mut ctx = TestContext::new().load_asm(
        "MOVC R1, #3
         MUL R2, R1, R1
         STORE R2, R15, #0
         HALT",
    );
    assert!(
        store_overtakes_producer(&mut ctx, 4008, 4004),
        "STORE waited for the multiply to write back"
    );
    assert_eq!(ctx.mem(0), 9);
    ctx.assert_conservation();
}

#[test]
fn test_store_issues_as_load_delivers_its_data() {
    let mut ctx = TestContext::new().load_asm(
        "MOVC R1, #7
         STORE R1, R15, #4
         LOAD R2, R15, #4
         STORE R2, R15, #8
         HALT",
    );
    assert!(
        store_overtakes_producer(&mut ctx, 4012, 4008),
        "STORE waited for the load to write back"
    );
    assert_eq!(ctx.reg(2), 7);
    assert_eq!(ctx.mem(8), 7);
}

// ══════════════════════════════════════════════════════════
// Backpressure
// ══════════════════════════════════════════════════════════

const BUSY: &str = "MOVC R0, #1
MOVC R1, #2
MOVC R2, #3
MUL R3, R1, R2
MUL R4, R3, R2
ADD R5, R4, R0
MOVC R6, #7
MOVC R7, #8
HALT";

fn run_busy(config: Config) -> TestContext {
    let mut ctx = TestContext::with_config(config).load_asm(BUSY);
    let _ = ctx.run_to_halt();
    assert_eq!(ctx.reg(5), 19);
    assert_eq!(ctx.reg(7), 8);
    ctx
}

#[test]
fn test_register_exhaustion_stalls_then_recovers() {
    let mut config = Config::default();
    config.core.physical_registers = 18;
    let ctx = run_busy(config);
    assert!(ctx.sim.stats().stalls_register > 0);
    assert!(ctx.sim.stats().dispatch_stalls >= ctx.sim.stats().stalls_register);
}

#[test]
fn test_full_issue_queue_stalls_dispatch() {
    let mut config = Config::default();
    config.core.iq_capacity = 1;
    let ctx = run_busy(config);
    assert!(ctx.sim.stats().stalls_iq_full > 0);
}

#[test]
fn test_full_reorder_buffer_stalls_dispatch() {
    let mut config = Config::default();
    config.core.rob_capacity = 2;
    let ctx = run_busy(config);
    assert!(ctx.sim.stats().stalls_rob_full > 0);
}

#[test]
fn test_taken_branch_holds_front_end_until_retire() {
    let mut ctx = TestContext::new().load_asm(
        "MOVC R0, #1
         BNZ #8
         MOVC R1, #1
         HALT",
    );
    let _ = ctx.run_to_halt();
    assert!(ctx.sim.stats().stalls_taken > 0);
    assert_eq!(ctx.sim.stats().taken_branches, 1);
}

#[test]
fn test_second_branch_waits_for_first_to_issue() {
    let mut ctx = TestContext::new().load_asm(
        "MOVC R0, #0
         MUL R2, R0, R0
         BNZ #8
         BNZ #8
         MOVC R1, #1
         HALT",
    );
    let _ = ctx.run_to_halt();
    assert_eq!(ctx.reg(1), 1);
    assert_eq!(ctx.sim.stats().taken_branches, 0);
    assert!(ctx.sim.stats().stalls_branch > 0);
}
