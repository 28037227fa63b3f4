//! CPU Core Definition and Initialization.
//!
//! This module defines the central `Cpu` structure, which serves as the container for the
//! architectural state the pipeline operates on. It holds:
//! 1. **Register State:** The unified register file with its rename tables.
//! 2. **Memory:** The word-addressable data memory.
//! 3. **Program:** The loaded instructions and the fetch address.
//! 4. **Status:** The committed branch condition, the halted flag, and statistics.

use crate::common::error::Fault;
use crate::common::reg::{ArchReg, RegisterName};
use crate::config::Config;
use crate::core::arch::urf::Urf;
use crate::isa::instruction::Instruction;
use crate::soc::memory::DataMemory;
use crate::stats::SimStats;

/// Main CPU structure containing all architectural state.
#[derive(Clone, Debug)]
pub struct Cpu {
    /// Unified register file (physical registers, RAT, RRAT).
    pub urf: Urf,
    /// Data memory.
    pub memory: DataMemory,
    /// Program instructions, the first at `code_base`.
    pub program: Vec<Instruction>,
    /// Program Counter: next fetch address.
    pub pc: u32,
    /// Fetch address of the first instruction.
    pub code_base: u32,
    /// Number of general registers; `X` uses the next index.
    pub arch_registers: usize,
    /// Condition value from the last committed arithmetic instruction.
    pub condition: i32,
    /// Set once `HALT` retires.
    pub halted: bool,
    /// Performance statistics.
    pub stats: SimStats,
}

impl Cpu {
    /// Creates a new CPU with an empty program.
    ///
    /// # Arguments
    ///
    /// * `config` - The simulator configuration parameters.
    pub fn new(config: &Config) -> Self {
        let arch_registers = config.core.arch_registers;
        Self {
            urf: Urf::new(arch_registers + 1, config.core.physical_registers),
            memory: DataMemory::new(config.memory.size_bytes),
            program: Vec::new(),
            pc: config.general.code_base,
            code_base: config.general.code_base,
            arch_registers,
            condition: 0,
            halted: false,
            stats: SimStats::default(),
        }
    }

    /// Installs a program and returns every architectural structure to its reset state.
    pub fn reset(&mut self, program: Vec<Instruction>) {
        self.urf.reset();
        self.memory.clear();
        self.program = program;
        self.pc = self.code_base;
        self.condition = 0;
        self.halted = false;
        self.stats = SimStats::default();
    }

    /// Returns the instruction at a fetch address.
    ///
    /// # Returns
    ///
    /// `None` past the end of the program, or `Fault::InvalidFetchAddress` if `pc` is
    /// below the code base or misaligned.
    pub fn instruction_at(&self, pc: u32) -> Result<Option<Instruction>, Fault> {
        if pc < self.code_base || pc % 4 != 0 {
            return Err(Fault::InvalidFetchAddress { pc });
        }
        let index = ((pc - self.code_base) / 4) as usize;
        Ok(self.program.get(index).copied())
    }

    /// Maps a register name to its architectural index.
    pub const fn arch_index(&self, name: RegisterName) -> Option<ArchReg> {
        name.index(self.arch_registers)
    }

    /// Returns the committed value of a named register.
    pub fn register_value(&self, name: RegisterName) -> Option<i32> {
        self.arch_index(name)
            .map(|arch| self.urf.architectural_value(arch))
    }
}
