//! Pipeline orchestration.
//!
//! A [`Pipeline`] combines the in-order frontend with the out-of-order backend and
//! fixes the order the stages run in within one cycle:
//! 1. **Advance:** Functional-unit latches shift one stage.
//! 2. **Commit:** The ROB head retires; a taken branch squashes here.
//! 3. **Issue:** At most one ready instruction leaves the issue queue.
//! 4. **Execute:** Every functional-unit stage does its work.
//! 5. **Frontend:** Dispatch, rename and fetch, in that order.
//! 6. **Forward:** Results produced this cycle are broadcast to waiting consumers.

use std::fmt;

use crate::common::error::Fault;
use crate::config::Config;
use crate::core::cpu::Cpu;
use crate::core::pipeline::backend::{Backend, commit, execute, issue};
use crate::core::pipeline::frontend::Frontend;
use crate::core::pipeline::latches::ExecEntry;

/// The full pipeline: frontend latches plus backend structures.
#[derive(Clone, Debug)]
pub struct Pipeline {
    /// Fetch, rename and dispatch.
    pub frontend: Frontend,
    /// Issue queue, functional units and reorder buffer.
    pub backend: Backend,
}

impl Pipeline {
    /// Creates an empty pipeline sized from the configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            frontend: Frontend::default(),
            backend: Backend::new(config),
        }
    }

    /// Run one cycle of the entire pipeline.
    ///
    /// Does nothing after `HALT` has retired.
    pub fn tick(&mut self, cpu: &mut Cpu) -> Result<(), Fault> {
        if cpu.halted {
            return Ok(());
        }
        cpu.stats.cycles += 1;

        self.backend.advance();

        commit::commit_stage(cpu, &mut self.backend, &mut self.frontend)?;
        if cpu.halted {
            return Ok(());
        }

        if !issue::issue_stage(&mut self.backend, &cpu.urf)? {
            cpu.stats.no_issue_cycles += 1;
        }

        if execute::execute_stage(&mut self.backend, cpu)? {
            self.frontend.taken_stall = true;
        }

        self.frontend.tick(cpu, &mut self.backend)?;

        self.backend.forward();
        Ok(())
    }

    /// Returns true if no instruction is anywhere in the pipeline.
    pub fn is_empty(&self) -> bool {
        self.frontend.is_empty()
            && self.backend.iq.is_empty()
            && self.backend.rob.is_empty()
            && self.backend.units_idle()
    }
}

fn stage(f: &mut fmt::Formatter<'_>, name: &str, entry: Option<&ExecEntry>) -> fmt::Result {
    match entry {
        Some(e) => writeln!(f, "{name:<11}: ({}) {}", e.pc, e.decoded),
        None => writeln!(f, "{name:<11}: empty"),
    }
}

impl fmt::Display for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.frontend)?;
        let b = &self.backend;
        stage(f, "ALU", b.alu.execute.as_ref())?;
        stage(f, "ALU WB", b.alu.writeback.as_ref())?;
        match &b.mul.active {
            Some(e) => writeln!(
                f,
                "{:<11}: ({}) {} [{}/{}]",
                "MUL",
                e.pc,
                e.decoded,
                b.mul.progress,
                b.mul.latency()
            )?,
            None => writeln!(f, "{:<11}: empty", "MUL")?,
        }
        stage(f, "MUL WB", b.mul.writeback.as_ref())?;
        stage(f, "BR", b.bru.resolve.as_ref())?;
        stage(f, "BR WB", b.bru.complete.as_ref())?;
        stage(f, "LS ADDR", b.lsu.address.as_ref())?;
        stage(f, "LS MEM", b.lsu.memory.as_ref())?;
        stage(f, "LS WB", b.lsu.writeback.as_ref())?;
        writeln!(
            f,
            "IQ {}/{}  ROB {}/{}",
            b.iq.len(),
            b.iq.capacity(),
            b.rob.len(),
            b.rob.capacity()
        )
    }
}
