//! Register-file properties over randomly generated programs.
//!
//! For branch-free programs the pipeline must agree with a sequential interpreter,
//! commit in program order, and keep the allocation bitmap equal to the registers
//! named by the RAT, the RRAT and in-flight destinations on every cycle. Around taken
//! branches, the RAT must equal the RRAT right after each squash.

use crate::common::harness::TestContext;
use crate::common::reference::interpret;
use apexsim_core::common::RegisterName::General as R;
use apexsim_core::config::Config;
use apexsim_core::isa::{Instruction, Opcode};
use proptest::prelude::*;

/// Registers the generated programs write; R15 stays 0 and serves as a memory base.
const WRITABLE: usize = 8;
const BASE: usize = 15;

fn arb_instruction() -> impl Strategy<Value = Instruction> {
    let reg = || (0..WRITABLE).prop_map(R);
    let word = (0..16i32).prop_map(|w| w * 4);
    let op = prop::sample::select(vec![
        Opcode::Add,
        Opcode::Sub,
        Opcode::Mul,
        Opcode::And,
        Opcode::Or,
        Opcode::Xor,
    ]);
    prop_oneof![
        4 => (op, reg(), reg(), reg()).prop_map(|(op, rd, a, b)| Instruction::register(op, rd, a, b)),
        3 => (reg(), -100..100i32).prop_map(|(rd, lit)| Instruction::movc(rd, lit)),
        1 => (reg(), word.clone()).prop_map(|(rs, lit)| Instruction::store(rs, R(BASE), lit)),
        1 => (reg(), word).prop_map(|(rd, lit)| Instruction::load(rd, R(BASE), lit)),
    ]
}

fn arb_program() -> impl Strategy<Value = Vec<Instruction>> {
    prop::collection::vec(arb_instruction(), 1..24).prop_map(|mut program| {
        program.push(Instruction::halt());
        program
    })
}

fn arb_config() -> impl Strategy<Value = Config> {
    (18usize..26, 1usize..6, 1usize..10, 1u32..5).prop_map(|(phys, iq, rob, mul)| {
        let mut config = Config::default();
        config.core.physical_registers = phys;
        config.core.iq_capacity = iq;
        config.core.rob_capacity = rob;
        config.core.mul_latency = mul;
        config
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_branch_free_matches_sequential_model(program in arb_program(), config in arb_config()) {
        let arch = config.core.arch_registers;
        let mut ctx = TestContext::with_config(config).load(&program);
        let _ = ctx.run_to_halt();

        let expected = interpret(&program, arch);
        for n in 0..WRITABLE {
            prop_assert_eq!(ctx.reg(n), expected.regs[n], "R{}", n);
        }
        for &(addr, _) in &expected.stores {
            let last = expected.stores.iter().rev().find(|(a, _)| *a == addr).map(|&(_, v)| v);
            prop_assert_eq!(Some(ctx.mem(addr)), last);
        }
        prop_assert_eq!(ctx.sim.rat(), ctx.sim.rrat());
    }

    #[test]
    fn prop_branch_free_commits_in_program_order(program in arb_program(), config in arb_config()) {
        let mut ctx = TestContext::with_config(config).load(&program);
        let committed = ctx.run_recording_commits();
        let fetched: Vec<u32> = (0..program.len() as u32).map(|i| 4000 + 4 * i).collect();
        prop_assert_eq!(committed, fetched);
    }

    #[test]
    fn prop_squash_restores_rat_from_rrat(n in 1i32..8, phys in 18usize..24) {
        let mut ctx = TestContext::with_physical_registers(phys).load_asm(&format!(
            "MOVC R0, #{n}
             MOVC R1, #0
             MOVC R2, #1
             ADD R1, R1, R0
             SUB R0, R0, R2
             BNZ #-8
             HALT"
        ));

        let mut squashes = 0;
        while !ctx.sim.cycle(1).unwrap() {
            ctx.assert_conservation();
            if ctx.sim.stats().taken_branches > squashes {
                squashes = ctx.sim.stats().taken_branches;
                prop_assert_eq!(ctx.sim.rat(), ctx.sim.rrat());
            }
            prop_assert!(ctx.sim.stats().cycles < 5_000);
        }
        prop_assert_eq!(squashes, u64::try_from(n - 1).unwrap());
        prop_assert_eq!(ctx.reg(1), n * (n + 1) / 2);
    }
}
