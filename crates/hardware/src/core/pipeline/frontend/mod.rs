//! Frontend pipeline stages.
//!
//! The frontend is in order and handles: Fetch -> Decode-1 (rename) -> Decode-2 (dispatch).
//! Stages run in reverse order each cycle so an instruction advances at most one stage.
//!
//! The whole frontend holds when:
//! 1. **Taken Branch:** A branch resolved taken and has not retired yet.
//! 2. **Second Branch:** A branch waits in the issue queue and another is being decoded.
//! 3. **Backpressure:** A later stage cannot accept its input.

/// Decode-2: dispatch into the issue queue and reorder buffer.
pub mod dispatch;

/// Fetch stage.
pub mod fetch;

/// Decode-1: register renaming.
pub mod rename;

use std::fmt;

use crate::common::error::Fault;
use crate::common::reg::PhysReg;
use crate::core::cpu::Cpu;
use crate::core::pipeline::backend::Backend;
use crate::core::pipeline::latches::{FetchEntry, RenameEntry};
use crate::core::pipeline::signals::FuClass;
use crate::stats::StallReason;

/// The in-order frontend.
#[derive(Clone, Debug, Default)]
pub struct Frontend {
    /// Fetch -> Decode-1 latch.
    pub fetch_rename: Option<FetchEntry>,
    /// Decode-1 -> Decode-2 latch.
    pub rename_dispatch: Option<RenameEntry>,
    /// Set when a branch resolves taken; cleared by the squash at its retirement.
    pub taken_stall: bool,
    /// Register of the youngest in-flight condition producer, if not yet committed.
    pub condition_source: Option<PhysReg>,
}

impl Frontend {
    /// Executes one cycle of all frontend stages (reverse order).
    pub fn tick(&mut self, cpu: &mut Cpu, backend: &mut Backend) -> Result<(), Fault> {
        if self.taken_stall {
            cpu.stats.record_stall(StallReason::TakenBranch);
            return Ok(());
        }
        if self.branch_hazard(backend) {
            cpu.stats.record_stall(StallReason::BranchInFlight);
            return Ok(());
        }

        if let Some(reason) = dispatch::dispatch_stage(cpu, &mut self.rename_dispatch, backend)? {
            tracing::debug!(%reason, "dispatch stalled");
            cpu.stats.record_stall(reason.into());
            return Ok(());
        }

        if let Some(reason) = rename::rename_stage(
            cpu,
            &mut self.fetch_rename,
            &mut self.rename_dispatch,
            &mut self.condition_source,
        )? {
            tracing::debug!(%reason, "rename stalled");
            cpu.stats.record_stall(reason.into());
            return Ok(());
        }

        fetch::fetch_stage(cpu, &mut self.fetch_rename)
    }

    /// Returns true if a branch is waiting in the issue queue while another is being
    /// decoded.
    fn branch_hazard(&self, backend: &Backend) -> bool {
        let decoding_branch = self
            .fetch_rename
            .as_ref()
            .is_some_and(|e| e.inst.opcode.is_branch())
            || self
                .rename_dispatch
                .as_ref()
                .is_some_and(|e| e.decoded.opcode.is_branch());
        decoding_branch && backend.iq.contains_class(FuClass::Branch)
    }

    /// Delivers a value to the rename latch's waiting operands.
    pub fn capture(&mut self, reg: PhysReg, value: i32) {
        if let Some(entry) = self.rename_dispatch.as_mut() {
            entry.capture(reg, value);
        }
    }

    /// Flushes all frontend latches and clears the taken-branch hold.
    ///
    /// # Returns
    ///
    /// The destination register allocated by the discarded rename entry, if any.
    pub fn flush(&mut self) -> Option<PhysReg> {
        let dest = self.rename_dispatch.take().and_then(|e| e.decoded.dest);
        self.fetch_rename = None;
        self.taken_stall = false;
        self.condition_source = None;
        dest
    }

    /// Returns true if neither latch holds an instruction.
    pub const fn is_empty(&self) -> bool {
        self.fetch_rename.is_none() && self.rename_dispatch.is_none()
    }
}

impl fmt::Display for Frontend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.fetch_rename {
            Some(e) => writeln!(f, "Fetch      : ({}) {}", e.pc, e.inst)?,
            None => writeln!(f, "Fetch      : empty")?,
        }
        match &self.rename_dispatch {
            Some(e) => writeln!(f, "Decode/Ren : ({}) {} [{}]", e.pc, e.inst, e.decoded),
            None => writeln!(f, "Decode/Ren : empty"),
        }
    }
}
