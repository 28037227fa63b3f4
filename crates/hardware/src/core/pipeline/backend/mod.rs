//! Backend pipeline stages.
//!
//! The backend covers: Issue Queue -> Functional Units -> Reorder Buffer -> Commit.
//! Each stage is a free function over the shared [`Backend`] state:
//! 1. **Issue:** Wakeup, per-class select and arbitration by age.
//! 2. **Execute:** Every functional-unit stage, writeback first.
//! 3. **Commit:** In-order retirement and squash on a taken branch.

/// Commit stage and squash.
pub mod commit;

/// Execute stage for all functional units.
pub mod execute;

/// Issue stage.
pub mod issue;

/// Functional-unit latch chains.
pub mod units;

use crate::common::error::Backpressure;
use crate::common::reg::PhysReg;
use crate::config::Config;
use crate::core::pipeline::issue_queue::IssueQueue;
use crate::core::pipeline::rob::{Rob, RobEntry};
use crate::core::pipeline::traits::PipelineLatch;

pub use units::{AluPipe, BranchPipe, LsPipe, MulPipe};

/// Out-of-order backend state.
#[derive(Clone, Debug)]
pub struct Backend {
    /// Dispatched instructions waiting for operands.
    pub iq: IssueQueue,
    /// Program-order record of every in-flight instruction.
    pub rob: Rob,
    /// Integer ALU.
    pub alu: AluPipe,
    /// Multiplier.
    pub mul: MulPipe,
    /// Branch unit.
    pub bru: BranchPipe,
    /// Load/store unit.
    pub lsu: LsPipe,
}

impl Backend {
    /// Creates an empty backend sized from the configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            iq: IssueQueue::new(config.core.iq_capacity),
            rob: Rob::new(config.core.rob_capacity),
            alu: AluPipe::default(),
            mul: MulPipe::new(config.core.mul_latency),
            bru: BranchPipe::default(),
            lsu: LsPipe::default(),
        }
    }

    /// Shifts every functional-unit latch chain one stage.
    pub fn advance(&mut self) {
        self.alu.advance();
        self.mul.advance();
        self.bru.advance();
        self.lsu.advance();
    }

    /// Empties the issue queue, the units and the ROB.
    ///
    /// # Returns
    ///
    /// The discarded ROB entries, youngest last, so their registers can be freed.
    pub fn flush(&mut self) -> Vec<RobEntry> {
        self.iq.flush();
        self.alu.flush();
        self.mul.flush();
        self.bru.flush();
        self.lsu.flush();
        self.rob.flush_all()
    }

    /// Checks whether the dispatch stage may insert an instruction.
    ///
    /// # Returns
    ///
    /// The structure that is full, if any.
    pub fn can_dispatch(&self) -> Result<(), Backpressure> {
        if self.iq.is_full() {
            return Err(Backpressure::IssueQueueFull);
        }
        if self.rob.free_slots() == 0 {
            return Err(Backpressure::ReorderBufferFull);
        }
        Ok(())
    }

    /// Returns true if no unit holds an instruction.
    pub fn units_idle(&self) -> bool {
        self.alu.is_empty() && self.mul.is_empty() && self.bru.is_empty() && self.lsu.is_empty()
    }

    /// Returns true if a value for `reg` will be broadcast at the end of this cycle.
    pub fn forward_reachable(&self, reg: PhysReg) -> bool {
        self.mul.completes_this_cycle(reg) || self.lsu.loads_this_cycle(reg)
    }

    /// Broadcasts the results produced this cycle.
    ///
    /// Sources: the ALU execute stage, a multiplication finishing its last cycle,
    /// and a `LOAD` in the memory stage.
    pub fn forward(&mut self) {
        let alu = self.alu.execute.as_ref();
        let mul = self.mul.just_completed();
        let load = self.lsu.memory.as_ref().filter(|e| e.decoded.opcode.is_load());
        let results: Vec<(PhysReg, i32)> = [alu, mul, load]
            .into_iter()
            .flatten()
            .filter_map(|e| e.decoded.dest.map(|reg| (reg, e.result)))
            .collect();

        for (reg, value) in results {
            tracing::debug!(%reg, value, "forward");
            self.broadcast(reg, value);
        }
    }

    /// Delivers `value` to every waiting consumer of `reg` in the backend.
    pub fn broadcast(&mut self, reg: PhysReg, value: i32) {
        self.iq.forward(reg, value);
        if let Some(entry) = self.lsu.address.as_mut() {
            entry.capture(reg, value);
        }
    }
}
