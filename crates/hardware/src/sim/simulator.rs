//! Simulator: owns both the CPU and the pipeline side-by-side.
//!
//! The simulator is the driver-facing API. It provides:
//! 1. **Initialization:** Validating a program and resetting every structure.
//! 2. **Cycling:** Advancing up to `n` cycles, stopping when `HALT` retires.
//! 3. **Inspection:** Read-only views of the queues, rename tables, registers and memory.
//!
//! A fault ends the run: the simulator keeps it and returns it from every later
//! `cycle` call until the next `initialize`.

use std::fmt;

use crate::common::error::{Fault, SimError};
use crate::common::reg::{PhysReg, RegisterName};
use crate::config::Config;
use crate::core::Cpu;
use crate::core::arch::PhysicalRegister;
use crate::core::pipeline::Pipeline;
use crate::core::pipeline::issue_queue::IqEntry;
use crate::core::pipeline::rob::RobEntry;
use crate::isa::instruction::Instruction;
use crate::stats::SimStats;

/// Top-level simulator: CPU architectural state + pipeline.
#[derive(Clone, Debug)]
pub struct Simulator {
    /// CPU architectural state (URF, memory, program, stats).
    pub cpu: Cpu,
    /// Pipeline implementation (frontend + backend).
    pub pipeline: Pipeline,
    config: Config,
    fault: Option<Fault>,
}

impl Simulator {
    /// Creates a simulator with an empty program.
    ///
    /// # Returns
    ///
    /// `SimError::Config` if the configuration is rejected.
    pub fn new(config: Config) -> Result<Self, SimError> {
        config.validate()?;
        Ok(Self {
            cpu: Cpu::new(&config),
            pipeline: Pipeline::new(&config),
            config,
            fault: None,
        })
    }

    /// Returns the configuration the engine was built with.
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Loads a program at the code base and resets all state.
    ///
    /// Clears every latch, the rename tables, the issue queue, the reorder buffer,
    /// memory and the statistics. The program is checked first; a rejected program
    /// leaves the simulator untouched.
    pub fn initialize(&mut self, program: Vec<Instruction>) -> Result<(), SimError> {
        self.check_program(&program)?;

        self.cpu.reset(program);
        self.pipeline = Pipeline::new(&self.config);
        self.fault = None;
        tracing::info!(
            instructions = self.cpu.program.len(),
            code_base = self.cpu.code_base,
            "program loaded"
        );
        Ok(())
    }

    fn check_program(&self, program: &[Instruction]) -> Result<(), SimError> {
        let reject = |index: usize, inst: &Instruction, reason: String| SimError::InvalidProgram {
            index,
            text: inst.to_string(),
            reason,
        };
        for (index, inst) in program.iter().enumerate() {
            inst.check_shape()
                .map_err(|reason| reject(index, inst, reason.to_owned()))?;
            if let Some(name) = inst
                .registers()
                .find(|&name| self.cpu.arch_index(name).is_none())
            {
                return Err(reject(
                    index,
                    inst,
                    format!(
                        "register {name} is outside R0-R{}",
                        self.cpu.arch_registers - 1
                    ),
                ));
            }
        }
        Ok(())
    }

    /// Advances up to `n` cycles.
    ///
    /// # Returns
    ///
    /// `true` once `HALT` has retired; the remaining cycles are not run. `cycle(0)`
    /// changes nothing.
    pub fn cycle(&mut self, n: u64) -> Result<bool, SimError> {
        if let Some(fault) = &self.fault {
            return Err(fault.clone().into());
        }
        for _ in 0..n {
            if self.cpu.halted {
                break;
            }
            if let Err(fault) = self.pipeline.tick(&mut self.cpu) {
                tracing::error!(%fault, cycle = self.cpu.stats.cycles, "simulation aborted");
                self.fault = Some(fault.clone());
                return Err(fault.into());
            }
        }
        Ok(self.cpu.halted)
    }

    /// Rebuilds the engine with `n` physical registers.
    ///
    /// The program is discarded; call [`initialize`](Self::initialize) again.
    pub fn set_physical_registers(&mut self, n: usize) -> Result<(), SimError> {
        let mut config = self.config.clone();
        config.core.physical_registers = n;
        *self = Self::new(config)?;
        tracing::info!(physical_registers = n, "register file resized");
        Ok(())
    }

    /// Returns true once `HALT` has retired.
    pub const fn is_halted(&self) -> bool {
        self.cpu.halted
    }

    /// Returns the fault that ended the run, if any.
    pub const fn fault(&self) -> Option<&Fault> {
        self.fault.as_ref()
    }

    /// Returns the next fetch address.
    pub const fn pc(&self) -> u32 {
        self.cpu.pc
    }

    /// Returns the statistics counters.
    pub const fn stats(&self) -> &SimStats {
        &self.cpu.stats
    }

    /// Returns the committed value of a named register, if the machine has it.
    pub fn register_value(&self, name: RegisterName) -> Option<i32> {
        self.cpu.register_value(name)
    }

    /// Iterates over the issue queue in program order.
    pub fn issue_queue(&self) -> impl Iterator<Item = &IqEntry> + '_ {
        self.pipeline.backend.iq.iter()
    }

    /// Iterates over the reorder buffer, head first.
    pub fn rob_entries(&self) -> impl Iterator<Item = &RobEntry> + '_ {
        self.pipeline.backend.rob.iter()
    }

    /// Returns the speculative rename table, indexed by architectural register.
    pub fn rat(&self) -> &[PhysReg] {
        self.cpu.urf.rat()
    }

    /// Returns the committed rename table, indexed by architectural register.
    pub fn rrat(&self) -> &[PhysReg] {
        self.cpu.urf.rrat()
    }

    /// Iterates over every physical register with its allocation status.
    pub fn physical_registers(
        &self,
    ) -> impl Iterator<Item = (PhysReg, PhysicalRegister, bool)> + '_ {
        self.cpu.urf.registers()
    }

    /// Returns the number of unallocated physical registers.
    pub fn free_registers(&self) -> usize {
        self.cpu.urf.free_count()
    }

    /// Returns `(address, value)` for each word from `start` through `end`.
    pub fn memory_range(&self, start: i32, end: i32) -> Result<Vec<(i32, i32)>, SimError> {
        Ok(self.cpu.memory.range(start, end)?)
    }

    /// Iterates over the most recently written memory addresses, oldest first.
    pub fn recent_writes(&self) -> impl Iterator<Item = u32> + '_ {
        self.cpu.memory.recent_writes()
    }

    /// Returns the name used for an architectural index in listings.
    pub fn arch_name(&self, index: usize) -> RegisterName {
        if index == self.cpu.arch_registers {
            RegisterName::Link
        } else {
            RegisterName::General(index)
        }
    }
}

impl fmt::Display for Simulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "cycle {}  pc {}  retired {}{}",
            self.cpu.stats.cycles,
            self.cpu.pc,
            self.cpu.stats.instructions_retired,
            if self.cpu.halted { "  [halted]" } else { "" }
        )?;
        write!(f, "{}", self.pipeline)
    }
}
