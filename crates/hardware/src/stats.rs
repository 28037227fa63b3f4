//! Simulation statistics collection and reporting.
//!
//! This module tracks performance metrics for the pipeline simulator. It provides:
//! 1. **Cycle and IPC:** Total cycles, retired instructions, and derived metrics (CPI).
//! 2. **Instruction mix:** Counts by category (ALU, MUL, load, store, branch).
//! 3. **Stalls:** Front-end stall cycles by cause, and cycles with nothing issued.
//! 4. **Speculation:** Taken branches and the instructions they squashed.

use std::time::Instant;

use crate::common::error::Backpressure;
use crate::core::pipeline::signals::FuClass;
use crate::isa::opcode::Opcode;

/// Why the front end held its instructions for a cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StallReason {
    /// No free physical register for a destination.
    RegisterExhausted,
    /// The issue queue is full.
    IssueQueueFull,
    /// The reorder buffer is full.
    ReorderBufferFull,
    /// A branch is waiting in the issue queue while another is being decoded.
    BranchInFlight,
    /// A taken branch has resolved and has not yet retired.
    TakenBranch,
}

impl From<Backpressure> for StallReason {
    fn from(reason: Backpressure) -> Self {
        match reason {
            Backpressure::RegisterExhausted => Self::RegisterExhausted,
            Backpressure::IssueQueueFull => Self::IssueQueueFull,
            Backpressure::ReorderBufferFull => Self::ReorderBufferFull,
        }
    }
}

/// Simulation statistics structure tracking all performance metrics.
#[derive(Clone, Debug)]
pub struct SimStats {
    start_time: Instant,
    /// Total simulator cycles elapsed.
    pub cycles: u64,
    /// Number of instructions committed (retired).
    pub instructions_retired: u64,

    /// Count of `LOAD` instructions retired.
    pub inst_load: u64,
    /// Count of `STORE` instructions retired.
    pub inst_store: u64,
    /// Count of branch/jump instructions retired.
    pub inst_branch: u64,
    /// Count of ALU instructions retired (including `HALT`).
    pub inst_alu: u64,
    /// Count of `MUL` instructions retired.
    pub inst_mul: u64,

    /// Cycles in which the front end held its instructions.
    pub dispatch_stalls: u64,
    /// Cycles in which nothing issued.
    pub no_issue_cycles: u64,
    /// Stall cycles waiting for a free physical register.
    pub stalls_register: u64,
    /// Stall cycles waiting for an issue queue slot.
    pub stalls_iq_full: u64,
    /// Stall cycles waiting for a reorder buffer slot.
    pub stalls_rob_full: u64,
    /// Stall cycles holding a second branch.
    pub stalls_branch: u64,
    /// Stall cycles between a taken resolution and its retirement.
    pub stalls_taken: u64,

    /// Taken branches retired.
    pub taken_branches: u64,
    /// In-flight instructions discarded by squashes.
    pub squashed_instructions: u64,
}

impl Default for SimStats {
    /// Returns the default value.
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            cycles: 0,
            instructions_retired: 0,
            inst_load: 0,
            inst_store: 0,
            inst_branch: 0,
            inst_alu: 0,
            inst_mul: 0,
            dispatch_stalls: 0,
            no_issue_cycles: 0,
            stalls_register: 0,
            stalls_iq_full: 0,
            stalls_rob_full: 0,
            stalls_branch: 0,
            stalls_taken: 0,
            taken_branches: 0,
            squashed_instructions: 0,
        }
    }
}

/// Section names for selective stats output.
///
/// Valid section identifiers: `"summary"`, `"core"`, `"instruction_mix"`, `"speculation"`.
/// Pass an empty slice to `print_sections` to print all sections.
pub const STATS_SECTIONS: &[&str] = &["summary", "core", "instruction_mix", "speculation"];

impl SimStats {
    /// Counts a retired instruction by category.
    pub fn record_retire(&mut self, opcode: Opcode) {
        self.instructions_retired += 1;
        match opcode.info().class {
            FuClass::Alu => self.inst_alu += 1,
            FuClass::Mul => self.inst_mul += 1,
            FuClass::Branch => self.inst_branch += 1,
            FuClass::LoadStore if opcode.is_load() => self.inst_load += 1,
            FuClass::LoadStore => self.inst_store += 1,
        }
    }

    /// Counts one front-end stall cycle.
    pub fn record_stall(&mut self, reason: StallReason) {
        self.dispatch_stalls += 1;
        let counter = match reason {
            StallReason::RegisterExhausted => &mut self.stalls_register,
            StallReason::IssueQueueFull => &mut self.stalls_iq_full,
            StallReason::ReorderBufferFull => &mut self.stalls_rob_full,
            StallReason::BranchInFlight => &mut self.stalls_branch,
            StallReason::TakenBranch => &mut self.stalls_taken,
        };
        *counter += 1;
    }

    /// Counts a squash that discarded `count` in-flight instructions.
    pub fn record_squash(&mut self, count: usize) {
        self.taken_branches += 1;
        self.squashed_instructions += count as u64;
    }

    /// Retired instructions per cycle, or 0 before the first cycle.
    pub fn ipc(&self) -> f64 {
        if self.cycles == 0 {
            0.0
        } else {
            self.instructions_retired as f64 / self.cycles as f64
        }
    }

    /// Prints only the requested statistics sections to stdout.
    ///
    /// # Arguments
    ///
    /// * `sections` - Slice of section names to print, or empty for all.
    pub fn print_sections(&self, sections: &[String]) {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);
        let seconds = self.start_time.elapsed().as_secs_f64();
        let cyc = self.cycles.max(1) as f64;
        let instr = self.instructions_retired.max(1) as f64;
        let pct = |n: u64, total: f64| (n as f64 / total) * 100.0;

        if want("summary") {
            println!("\n==========================================================");
            println!("APEX PIPELINE SIMULATION STATISTICS");
            println!("==========================================================");
            println!("host_seconds             {seconds:.4} s");
            println!("sim_cycles               {}", self.cycles);
            println!("sim_insts                {}", self.instructions_retired);
            println!("sim_ipc                  {:.4}", self.ipc());
            println!("sim_cpi                  {:.4}", cyc / instr);
            println!("----------------------------------------------------------");
        }
        if want("core") {
            println!("CORE BREAKDOWN");
            println!(
                "  cycles.no_issue        {} ({:.2}%)",
                self.no_issue_cycles,
                pct(self.no_issue_cycles, cyc)
            );
            println!(
                "  stalls.dispatch        {} ({:.2}%)",
                self.dispatch_stalls,
                pct(self.dispatch_stalls, cyc)
            );
            println!("  stalls.register        {}", self.stalls_register);
            println!("  stalls.iq_full         {}", self.stalls_iq_full);
            println!("  stalls.rob_full        {}", self.stalls_rob_full);
            println!("  stalls.branch          {}", self.stalls_branch);
            println!("  stalls.taken           {}", self.stalls_taken);
            println!("----------------------------------------------------------");
        }
        if want("instruction_mix") {
            println!("INSTRUCTION MIX");
            for (name, count) in [
                ("op.alu", self.inst_alu),
                ("op.mul", self.inst_mul),
                ("op.load", self.inst_load),
                ("op.store", self.inst_store),
                ("op.branch", self.inst_branch),
            ] {
                println!("  {name:<22} {count} ({:.2}%)", pct(count, instr));
            }
            println!("----------------------------------------------------------");
        }
        if want("speculation") {
            println!("SPECULATION");
            println!("  branches.taken         {}", self.taken_branches);
            println!("  insts.squashed         {}", self.squashed_instructions);
        }
        println!("==========================================================");
    }

    /// Prints all statistics sections to stdout.
    ///
    /// Equivalent to `print_sections(&[])`.
    pub fn print(&self) {
        self.print_sections(&[]);
    }
}
