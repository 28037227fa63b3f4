//! Load/Store Unit (LSU).
//!
//! This module provides the two LSU operations the pipeline sequences across its
//! address and memory stages:
//! 1. **Address Generation:** Base register plus literal through the shared ALU adder.
//! 2. **Memory Access:** Checked word reads and writes against the data memory.

use crate::common::error::Fault;
use crate::core::pipeline::latches::ExecEntry;
use crate::core::pipeline::signals::{AluOp, MemOp};
use crate::core::units::alu::Alu;
use crate::soc::memory::DataMemory;

/// Load/Store Unit (LSU) for memory operations.
#[derive(Debug)]
pub struct Lsu;

impl Lsu {
    /// Computes the effective address of a load or store.
    ///
    /// `LOAD` addresses `src1 + literal`; `STORE` addresses `src2 + literal` and
    /// writes `src1`.
    pub fn effective_address(op: MemOp, entry: &ExecEntry) -> i32 {
        let base = match op {
            MemOp::Load => entry.src1.value,
            MemOp::Store => entry.src2.value,
        };
        Alu::execute(AluOp::Add, base, entry.decoded.literal)
    }

    /// Performs the memory access for an entry whose `result` holds the address.
    ///
    /// # Returns
    ///
    /// The loaded value for `LOAD`, `None` for `STORE`, or the access fault.
    pub fn access(
        op: MemOp,
        entry: &ExecEntry,
        memory: &mut DataMemory,
    ) -> Result<Option<i32>, Fault> {
        let addr = entry.result;
        match op {
            MemOp::Load => memory.read(addr).map(Some),
            MemOp::Store => {
                if !entry.src1.valid {
                    return Err(Fault::StoreDataUnavailable { pc: entry.pc });
                }
                memory.write(addr, entry.src1.value)?;
                Ok(None)
            }
        }
    }
}
