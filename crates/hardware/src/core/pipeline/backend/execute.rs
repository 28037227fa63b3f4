//! Execute Stage.
//!
//! Runs every functional-unit stage once per cycle. Within a unit, the downstream
//! stage runs first so an entry is only processed by the stage it occupies.
//!
//! Writeback stores the result in the destination register without marking it
//! valid and marks the ROB entry completed. The register becomes valid at commit.

use crate::common::error::Fault;
use crate::core::arch::urf::Urf;
use crate::core::cpu::Cpu;
use crate::core::pipeline::backend::Backend;
use crate::core::pipeline::latches::ExecEntry;
use crate::core::pipeline::rob::Rob;
use crate::core::pipeline::signals::{AluOp, MemOp};
use crate::core::units::alu::Alu;
use crate::core::units::bru::Bru;
use crate::core::units::lsu::Lsu;

/// Executes the functional units for one cycle.
///
/// # Returns
///
/// `true` if a branch resolved as taken this cycle.
pub fn execute_stage(backend: &mut Backend, cpu: &mut Cpu) -> Result<bool, Fault> {
    let Backend {
        rob,
        alu,
        mul,
        bru,
        lsu,
        ..
    } = backend;

    // ALU
    if let Some(entry) = alu.writeback.as_ref() {
        writeback(&mut cpu.urf, rob, entry);
    }
    if let Some(entry) = alu.execute.as_mut() {
        let info = entry.decoded.opcode.info();
        let b = if info.sources >= 2 {
            entry.src2.value
        } else {
            entry.decoded.literal
        };
        entry.result = Alu::execute(info.alu, entry.src1.value, b);
    }

    // MUL
    if let Some(entry) = mul.writeback.as_ref() {
        writeback(&mut cpu.urf, rob, entry);
    }
    if let Some(entry) = mul.step() {
        entry.result = Alu::execute(AluOp::Mul, entry.src1.value, entry.src2.value);
    }

    // Load/store
    if let Some(entry) = lsu.writeback.as_ref() {
        writeback(&mut cpu.urf, rob, entry);
    }
    if let Some(entry) = lsu.memory.as_mut() {
        let op = memory_op(entry)?;
        if let Some(value) = Lsu::access(op, entry, &mut cpu.memory)? {
            entry.result = value;
        }
        tracing::trace!(pc = entry.pc, addr = entry.result, "memory");
    }
    if let Some(entry) = lsu.address.as_mut() {
        let op = memory_op(entry)?;
        entry.result = Lsu::effective_address(op, entry);
    }

    // Branch
    if let Some(entry) = bru.complete.as_ref() {
        writeback(&mut cpu.urf, rob, entry);
    }
    let mut taken = false;
    if let Some(entry) = bru.resolve.as_mut() {
        let op = entry
            .decoded
            .opcode
            .info()
            .branch
            .ok_or(Fault::MalformedInstruction {
                pc: entry.pc,
                reason: "branch unit received a non-branch",
            })?;
        let outcome = Bru::resolve(op, entry.pc, entry.src1.value, entry.decoded.literal);
        rob.resolve_branch(entry.rob_tag, outcome.taken, outcome.target);
        entry.result = outcome.link.unwrap_or_default();
        taken = outcome.taken;
        tracing::debug!(
            pc = entry.pc,
            taken = outcome.taken,
            target_pc = outcome.target,
            "branch resolved"
        );
    }

    Ok(taken)
}

/// Writes a finished entry's result and marks it completed in the ROB.
fn writeback(urf: &mut Urf, rob: &mut Rob, entry: &ExecEntry) {
    if let Some(dest) = entry.decoded.dest {
        urf.write(dest, entry.result);
    }
    rob.complete(entry.rob_tag);
    tracing::trace!(pc = entry.pc, result = entry.result, "writeback");
}

fn memory_op(entry: &ExecEntry) -> Result<MemOp, Fault> {
    entry
        .decoded
        .opcode
        .info()
        .mem
        .ok_or(Fault::MalformedInstruction {
            pc: entry.pc,
            reason: "load/store unit received a non-memory instruction",
        })
}
