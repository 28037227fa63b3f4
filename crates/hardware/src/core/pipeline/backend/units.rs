//! Functional-unit latch chains.
//!
//! Each unit is a short chain of single-entry latches. `advance` runs at the start of a
//! cycle and moves every entry one stage downstream; the execute stage then does the
//! work of whatever sits in each latch.
//! 1. **ALU:** Execute, then Writeback.
//! 2. **MUL:** A multi-cycle execute stage holding one instruction, then Writeback.
//! 3. **Branch:** Resolve, then Complete.
//! 4. **Load/Store:** Address, then Memory, then Writeback.

use crate::common::reg::PhysReg;
use crate::core::pipeline::latches::ExecEntry;
use crate::core::pipeline::traits::PipelineLatch;

/// Integer ALU: one execute stage and one writeback stage.
#[derive(Clone, Debug, Default)]
pub struct AluPipe {
    /// Instruction computing its result this cycle.
    pub execute: Option<ExecEntry>,
    /// Instruction writing its result this cycle.
    pub writeback: Option<ExecEntry>,
}

impl AluPipe {
    /// Returns true if an instruction can issue to the unit this cycle.
    #[inline]
    pub const fn can_accept(&self) -> bool {
        self.execute.is_none()
    }
}

impl PipelineLatch for AluPipe {
    fn advance(&mut self) {
        self.writeback = self.execute.take();
    }

    fn flush(&mut self) {
        self.execute = None;
        self.writeback = None;
    }

    fn is_empty(&self) -> bool {
        self.execute.is_none() && self.writeback.is_none()
    }
}

/// Multiplier: holds one instruction for `latency` cycles, then writes back.
#[derive(Clone, Debug)]
pub struct MulPipe {
    /// Instruction being multiplied.
    pub active: Option<ExecEntry>,
    /// Execute cycles spent by the active instruction.
    pub progress: u32,
    /// Instruction writing its result this cycle.
    pub writeback: Option<ExecEntry>,
    latency: u32,
}

impl MulPipe {
    /// Creates an idle multiplier.
    pub const fn new(latency: u32) -> Self {
        Self {
            active: None,
            progress: 0,
            writeback: None,
            latency,
        }
    }

    /// Returns the configured execute latency.
    #[inline]
    pub const fn latency(&self) -> u32 {
        self.latency
    }

    /// Returns true if an instruction can issue to the unit this cycle.
    #[inline]
    pub const fn can_accept(&self) -> bool {
        self.active.is_none()
    }

    /// Starts a multiplication.
    pub fn accept(&mut self, entry: ExecEntry) {
        self.active = Some(entry);
        self.progress = 0;
    }

    /// Spends one execute cycle on the active instruction.
    ///
    /// # Returns
    ///
    /// The instruction if this was its last execute cycle.
    pub fn step(&mut self) -> Option<&mut ExecEntry> {
        let entry = self.active.as_mut()?;
        self.progress += 1;
        (self.progress == self.latency).then_some(entry)
    }

    /// Returns true if the active instruction produces `reg` during this cycle's
    /// execute stage.
    pub fn completes_this_cycle(&self, reg: PhysReg) -> bool {
        self.active
            .as_ref()
            .is_some_and(|e| e.decoded.dest == Some(reg) && self.progress + 1 == self.latency)
    }

    /// Returns the active instruction if it finished its last execute cycle.
    pub fn just_completed(&self) -> Option<&ExecEntry> {
        self.active
            .as_ref()
            .filter(|_| self.progress >= self.latency)
    }
}

impl PipelineLatch for MulPipe {
    fn advance(&mut self) {
        self.writeback = None;
        if self.just_completed().is_some() {
            self.writeback = self.active.take();
            self.progress = 0;
        }
    }

    fn flush(&mut self) {
        self.active = None;
        self.progress = 0;
        self.writeback = None;
    }

    fn is_empty(&self) -> bool {
        self.active.is_none() && self.writeback.is_none()
    }
}

/// Branch unit: a resolve stage and a completion stage.
#[derive(Clone, Debug, Default)]
pub struct BranchPipe {
    /// Branch evaluating its condition and target.
    pub resolve: Option<ExecEntry>,
    /// Branch writing its link value and completing in the ROB.
    pub complete: Option<ExecEntry>,
}

impl BranchPipe {
    /// Returns true if a branch can issue to the unit this cycle.
    #[inline]
    pub const fn can_accept(&self) -> bool {
        self.resolve.is_none()
    }
}

impl PipelineLatch for BranchPipe {
    fn advance(&mut self) {
        self.complete = self.resolve.take();
    }

    fn flush(&mut self) {
        self.resolve = None;
        self.complete = None;
    }

    fn is_empty(&self) -> bool {
        self.resolve.is_none() && self.complete.is_none()
    }
}

/// Load/store unit: address generation, memory access, writeback.
#[derive(Clone, Debug, Default)]
pub struct LsPipe {
    /// Instruction computing its effective address.
    pub address: Option<ExecEntry>,
    /// Instruction accessing data memory.
    pub memory: Option<ExecEntry>,
    /// Instruction writing its result and completing in the ROB.
    pub writeback: Option<ExecEntry>,
}

impl LsPipe {
    /// Returns true if a memory instruction can issue to the unit this cycle.
    #[inline]
    pub const fn can_accept(&self) -> bool {
        self.address.is_none()
    }

    /// Returns true if a `LOAD` producing `reg` is in the memory stage.
    pub fn loads_this_cycle(&self, reg: PhysReg) -> bool {
        self.memory
            .as_ref()
            .is_some_and(|e| e.decoded.opcode.is_load() && e.decoded.dest == Some(reg))
    }
}

impl PipelineLatch for LsPipe {
    fn advance(&mut self) {
        self.writeback = self.memory.take();
        self.memory = self.address.take();
    }

    fn flush(&mut self) {
        self.address = None;
        self.memory = None;
        self.writeback = None;
    }

    fn is_empty(&self) -> bool {
        self.address.is_none() && self.memory.is_none() && self.writeback.is_none()
    }
}
