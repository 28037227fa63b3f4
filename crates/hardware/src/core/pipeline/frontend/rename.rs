//! Decode-1: Register Renaming.
//!
//! Translates architectural registers into physical registers:
//! 1. **Sources:** Read from the RAT before the destination is mapped, so an
//!    instruction naming the same register as source and destination reads the
//!    previous producer.
//! 2. **Condition:** `BZ`/`BNZ` read the youngest arithmetic result in flight, or the
//!    committed condition value when there is none.
//! 3. **Destination:** Allocates a free physical register and installs it in the RAT.
//!
//! Without a free register the instruction stays in the fetch latch.

use crate::common::error::{Backpressure, Fault};
use crate::common::reg::{ArchReg, PhysReg, RegisterName};
use crate::core::cpu::Cpu;
use crate::core::pipeline::latches::{FetchEntry, RenameEntry, SourceOperand};
use crate::isa::instruction::DecodedInstruction;

/// Executes the rename stage.
///
/// # Arguments
///
/// * `cpu`       - Holds the URF and the committed condition value.
/// * `input`     - Fetch latch; emptied when the instruction moves on.
/// * `output`    - Rename latch; must be empty.
/// * `condition` - Youngest in-flight condition producer.
///
/// # Returns
///
/// The resource that was unavailable if the stage held.
pub fn rename_stage(
    cpu: &mut Cpu,
    input: &mut Option<FetchEntry>,
    output: &mut Option<RenameEntry>,
    condition: &mut Option<PhysReg>,
) -> Result<Option<Backpressure>, Fault> {
    let Some(fetched) = *input else {
        return Ok(None);
    };
    if output.is_some() {
        return Ok(None);
    }

    let pc = fetched.pc;
    let inst = fetched.inst;
    inst.check_shape()
        .map_err(|reason| Fault::MalformedInstruction { pc, reason })?;
    let info = inst.opcode.info();

    let src1 = if info.reads_condition {
        condition.map_or_else(|| SourceOperand::ready(cpu.condition), SourceOperand::pending)
    } else {
        read_source(cpu, pc, inst.rs1)?
    };
    let src2 = read_source(cpu, pc, inst.rs2)?;

    let arch_dest = inst.rd.map(|name| arch_index(cpu, pc, name)).transpose()?;
    let dest = match arch_dest {
        Some(arch) => {
            let phys = match cpu.urf.allocate() {
                Ok(phys) => phys,
                Err(reason) => return Ok(Some(reason)),
            };
            cpu.urf.map_rename(arch, phys);
            if info.sets_condition {
                *condition = Some(phys);
            }
            Some(phys)
        }
        None => None,
    };

    let decoded = DecodedInstruction {
        opcode: inst.opcode,
        dest,
        src1: src1.reg,
        src2: src2.reg,
        literal: inst.literal,
    };
    tracing::trace!(pc, %inst, renamed = %decoded, "rename");

    *output = Some(RenameEntry {
        pc,
        inst,
        decoded,
        arch_dest,
        src1,
        src2,
    });
    *input = None;
    Ok(None)
}

fn read_source(
    cpu: &Cpu,
    pc: u32,
    name: Option<RegisterName>,
) -> Result<SourceOperand, Fault> {
    match name {
        Some(name) => {
            let arch = arch_index(cpu, pc, name)?;
            Ok(SourceOperand::pending(cpu.urf.resolve_rename(arch)))
        }
        None => Ok(SourceOperand::unused()),
    }
}

fn arch_index(cpu: &Cpu, pc: u32, name: RegisterName) -> Result<ArchReg, Fault> {
    name.index(cpu.arch_registers)
        .ok_or(Fault::MalformedInstruction {
            pc,
            reason: "register index out of range",
        })
}
