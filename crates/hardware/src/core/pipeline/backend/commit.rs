//! Commit Stage: retire instructions from the ROB head.
//!
//! This stage retires at most one instruction per cycle, in program order:
//! 1. Commit the destination: mark it valid, update the RRAT, release the register it
//!    supersedes.
//! 2. Latch the condition value for arithmetic instructions.
//! 3. Stop the machine on `HALT`.
//! 4. Squash every younger instruction when a taken branch retires.

use crate::common::error::Fault;
use crate::core::cpu::Cpu;
use crate::core::pipeline::backend::Backend;
use crate::core::pipeline::frontend::Frontend;
use crate::isa::opcode::Opcode;

/// Executes the Commit stage.
///
/// Sets `cpu.halted` when `HALT` retires.
pub fn commit_stage(
    cpu: &mut Cpu,
    backend: &mut Backend,
    frontend: &mut Frontend,
) -> Result<(), Fault> {
    let Some(entry) = backend.rob.commit_head() else {
        return Ok(());
    };
    cpu.stats.record_retire(entry.decoded.opcode);
    tracing::debug!(pc = entry.pc, inst = %entry.inst, "commit");

    if let (Some(arch), Some(phys)) = (entry.arch_dest, entry.dest()) {
        if entry.decoded.opcode.info().sets_condition {
            cpu.condition = cpu.urf.value(phys);
            if frontend.condition_source == Some(phys) {
                frontend.condition_source = None;
            }
        }
        if let Some(released) = cpu.urf.commit(arch, phys) {
            backend.broadcast(released.reg, released.value);
            frontend.capture(released.reg, released.value);
        }
    }

    if entry.decoded.opcode == Opcode::Halt {
        cpu.halted = true;
        tracing::info!(pc = entry.pc, cycles = cpu.stats.cycles, "HALT retired");
        return Ok(());
    }

    if entry.taken {
        squash(cpu, backend, frontend, entry.target)?;
    }
    Ok(())
}

/// Discards every in-flight instruction and redirects fetch to `target`.
///
/// Frees each discarded destination register and restores the RAT from the RRAT.
pub fn squash(
    cpu: &mut Cpu,
    backend: &mut Backend,
    frontend: &mut Frontend,
    target: i32,
) -> Result<(), Fault> {
    let flushed = backend.flush();
    let mut squashed = flushed.len();
    for dest in flushed.iter().filter_map(|e| e.dest()) {
        cpu.urf.deallocate(dest);
    }

    if frontend.rename_dispatch.is_some() {
        squashed += 1;
    }
    if frontend.fetch_rename.is_some() {
        squashed += 1;
    }
    if let Some(dest) = frontend.flush() {
        cpu.urf.deallocate(dest);
    }

    cpu.urf.rollback();
    cpu.pc = u32::try_from(target).map_err(|_| Fault::InvalidFetchAddress {
        pc: target as u32,
    })?;
    cpu.stats.record_squash(squashed);
    tracing::info!(target_pc = target, squashed, "squash");
    Ok(())
}
