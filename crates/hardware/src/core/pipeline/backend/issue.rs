//! Issue Stage.
//!
//! Picks at most one instruction per cycle from the issue queue:
//! 1. **Wakeup:** Operands whose producers have committed are captured from the URF.
//! 2. **Select:** Each class with a free unit nominates its oldest ready entry.
//! 3. **Arbitrate:** The nominee with the lowest fetch address issues.
//!
//! Memory instructions issue strictly in program order, and never while an older
//! branch is unresolved or taken or an older `HALT` is in flight. A `STORE` may issue
//! before its data is ready when that value is broadcast in the same cycle.

use crate::common::error::Fault;
use crate::core::arch::urf::Urf;
use crate::core::pipeline::backend::Backend;
use crate::core::pipeline::signals::FuClass;

/// Executes the Issue stage.
///
/// # Returns
///
/// `true` if an instruction issued.
pub fn issue_stage(backend: &mut Backend, urf: &Urf) -> Result<bool, Fault> {
    backend.iq.wakeup(urf);

    let nominee = FuClass::ALL
        .into_iter()
        .filter_map(|class| select(backend, class))
        .min_by_key(|&index| backend.iq.get(index).map_or(u32::MAX, |e| e.pc));
    let Some(index) = nominee else {
        return Ok(false);
    };

    let entry = backend.iq.take(index)?;
    let class = entry.class();
    tracing::trace!(pc = entry.pc, inst = %entry.decoded, unit = %class, "issue");

    let exec = entry.into_exec();
    match class {
        FuClass::Alu => backend.alu.execute = Some(exec),
        FuClass::Mul => backend.mul.accept(exec),
        FuClass::Branch => backend.bru.resolve = Some(exec),
        FuClass::LoadStore => backend.lsu.address = Some(exec),
    }
    Ok(true)
}

/// Nominates the entry `class` would issue this cycle, if its unit is free.
fn select(backend: &Backend, class: FuClass) -> Option<usize> {
    match class {
        FuClass::Alu if backend.alu.can_accept() => backend.iq.select(class),
        FuClass::Mul if backend.mul.can_accept() => backend.iq.select(class),
        FuClass::Branch if backend.bru.can_accept() => backend.iq.select(class),
        FuClass::LoadStore if backend.lsu.can_accept() => select_memory(backend),
        _ => None,
    }
}

/// Nominates the oldest memory instruction when it may access memory.
fn select_memory(backend: &Backend) -> Option<usize> {
    let index = backend.iq.oldest(FuClass::LoadStore)?;
    let entry = backend.iq.get(index)?;
    if backend.rob.memory_blocked(entry.rob_tag) {
        return None;
    }
    if entry.is_ready() {
        return Some(index);
    }

    let data_forwarded = entry.decoded.opcode.is_store()
        && entry.src2.valid
        && entry
            .src1
            .reg
            .is_some_and(|reg| backend.forward_reachable(reg));
    data_forwarded.then_some(index)
}
