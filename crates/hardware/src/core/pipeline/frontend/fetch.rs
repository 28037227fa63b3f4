//! Fetch Stage.
//!
//! Reads the instruction at the PC into the fetch latch and advances the PC by 4.
//! Fetch does nothing while the latch is occupied or once the PC is past the end of
//! the program.

use crate::common::error::Fault;
use crate::core::cpu::Cpu;
use crate::core::pipeline::latches::FetchEntry;

/// Executes the Fetch stage.
pub fn fetch_stage(cpu: &mut Cpu, latch: &mut Option<FetchEntry>) -> Result<(), Fault> {
    if latch.is_some() {
        return Ok(());
    }
    let Some(inst) = cpu.instruction_at(cpu.pc)? else {
        return Ok(());
    };

    tracing::trace!(pc = cpu.pc, %inst, "fetch");
    *latch = Some(FetchEntry { pc: cpu.pc, inst });
    cpu.pc += 4;
    Ok(())
}
