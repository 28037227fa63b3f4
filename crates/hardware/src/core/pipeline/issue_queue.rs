//! Issue Queue (IQ).
//!
//! Holds dispatched instructions until their operands are ready. Entries are kept in
//! program order. It provides:
//! 1. **Wakeup:** Capturing operands from committed registers and forwarded results.
//! 2. **Select:** The oldest ready entry of a functional-unit class.
//! 3. **Removal:** Taking the selected entry out when it issues.
//! 4. **Occupancy Checks:** Capacity queries the dispatch stage consults before enqueueing.

use crate::common::error::Fault;
use crate::common::reg::PhysReg;
use crate::core::arch::urf::Urf;
use crate::core::pipeline::latches::{ExecEntry, SourceOperand};
use crate::core::pipeline::rob::RobTag;
use crate::core::pipeline::signals::FuClass;
use crate::isa::instruction::DecodedInstruction;

/// A dispatched instruction waiting to issue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IqEntry {
    /// Fetch address; older instructions have lower addresses within a path.
    pub pc: u32,
    /// Renamed form.
    pub decoded: DecodedInstruction,
    /// First source operand.
    pub src1: SourceOperand,
    /// Second source operand.
    pub src2: SourceOperand,
    /// Paired reorder-buffer entry.
    pub rob_tag: RobTag,
}

impl IqEntry {
    /// Returns the functional-unit class this entry issues to.
    #[inline]
    pub fn class(&self) -> FuClass {
        self.decoded.opcode.info().class
    }

    /// Returns true when every source the opcode declares has been captured.
    pub fn is_ready(&self) -> bool {
        match self.decoded.opcode.info().sources {
            0 => true,
            1 => self.src1.valid,
            _ => self.src1.valid && self.src2.valid,
        }
    }

    /// Captures `value` into every operand waiting on `reg`.
    pub fn capture(&mut self, reg: PhysReg, value: i32) {
        let _ = self.src1.capture(reg, value);
        let _ = self.src2.capture(reg, value);
    }

    /// Converts the entry into the first latch of its functional unit.
    pub const fn into_exec(self) -> ExecEntry {
        ExecEntry {
            pc: self.pc,
            decoded: self.decoded,
            src1: self.src1,
            src2: self.src2,
            rob_tag: self.rob_tag,
            result: 0,
        }
    }
}

/// Capacity-bounded, program-ordered issue queue.
#[derive(Clone, Debug)]
pub struct IssueQueue {
    entries: Vec<IqEntry>,
    capacity: usize,
}

impl IssueQueue {
    /// Creates an empty queue.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Returns the queue capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of waiting entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no entry is waiting.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if no entry can be added.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    /// Appends an entry in program order.
    ///
    /// # Returns
    ///
    /// `Fault::IssueQueueOverflow` if the queue is full; callers check `is_full` first.
    pub fn enqueue(&mut self, entry: IqEntry) -> Result<(), Fault> {
        if self.is_full() {
            return Err(Fault::IssueQueueOverflow {
                capacity: self.capacity,
            });
        }
        self.entries.push(entry);
        Ok(())
    }

    /// Captures operands whose producer register has committed.
    pub fn wakeup(&mut self, urf: &Urf) {
        for entry in &mut self.entries {
            for src in [&mut entry.src1, &mut entry.src2] {
                if let Some(reg) = src.reg.filter(|&r| !src.valid && urf.is_valid(r)) {
                    let _ = src.capture(reg, urf.value(reg));
                }
            }
        }
    }

    /// Delivers a forwarded result to every entry waiting on `reg`.
    pub fn forward(&mut self, reg: PhysReg, value: i32) {
        for entry in &mut self.entries {
            entry.capture(reg, value);
        }
    }

    /// Returns the index of the oldest ready entry of `class`.
    pub fn select(&self, class: FuClass) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.class() == class && e.is_ready())
    }

    /// Returns the index of the oldest entry of `class`, ready or not.
    pub fn oldest(&self, class: FuClass) -> Option<usize> {
        self.entries.iter().position(|e| e.class() == class)
    }

    /// Returns the entry at `index`.
    pub fn get(&self, index: usize) -> Option<&IqEntry> {
        self.entries.get(index)
    }

    /// Removes and returns the entry at `index` for issue.
    ///
    /// # Returns
    ///
    /// `Fault::IssueQueueUnderflow` if there is no entry at `index`.
    pub fn take(&mut self, index: usize) -> Result<IqEntry, Fault> {
        if index >= self.entries.len() {
            return Err(Fault::IssueQueueUnderflow { index });
        }
        Ok(self.entries.remove(index))
    }

    /// Returns true if any waiting entry belongs to `class`.
    pub fn contains_class(&self, class: FuClass) -> bool {
        self.entries.iter().any(|e| e.class() == class)
    }

    /// Discards every entry.
    pub fn flush(&mut self) {
        self.entries.clear();
    }

    /// Iterates over the entries in program order.
    pub fn iter(&self) -> impl Iterator<Item = &IqEntry> + '_ {
        self.entries.iter()
    }
}
