//! Decode-2: Dispatch.
//!
//! Moves the renamed instruction into the back end. Sources whose producer has
//! already committed are read from the URF; the rest wait in the issue queue for a
//! forward or for the producer to commit. Each dispatched instruction takes one ROB
//! slot and one issue-queue slot.

use crate::common::error::{Backpressure, Fault};
use crate::core::cpu::Cpu;
use crate::core::pipeline::backend::Backend;
use crate::core::pipeline::issue_queue::IqEntry;
use crate::core::pipeline::latches::RenameEntry;

/// Executes the dispatch stage.
///
/// # Returns
///
/// The full structure if the stage held.
pub fn dispatch_stage(
    cpu: &Cpu,
    latch: &mut Option<RenameEntry>,
    backend: &mut Backend,
) -> Result<Option<Backpressure>, Fault> {
    let Some(mut entry) = *latch else {
        return Ok(None);
    };
    if let Err(reason) = backend.can_dispatch() {
        return Ok(Some(reason));
    }

    for src in [&mut entry.src1, &mut entry.src2] {
        if let Some(reg) = src.reg.filter(|&r| !src.valid && cpu.urf.is_valid(r)) {
            let _ = src.capture(reg, cpu.urf.value(reg));
        }
    }

    let rob_tag = backend
        .rob
        .allocate(entry.pc, entry.inst, entry.decoded, entry.arch_dest)
        .ok_or(Fault::ReorderBufferOverflow {
            capacity: backend.rob.capacity(),
        })?;
    backend.iq.enqueue(IqEntry {
        pc: entry.pc,
        decoded: entry.decoded,
        src1: entry.src1,
        src2: entry.src2,
        rob_tag,
    })?;

    tracing::trace!(pc = entry.pc, inst = %entry.decoded, tag = rob_tag.0, "dispatch");
    *latch = None;
    Ok(None)
}
