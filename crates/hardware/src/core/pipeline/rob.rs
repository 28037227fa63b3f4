//! Reorder Buffer (ROB) for in-order commit.
//!
//! The ROB is a circular buffer that tracks in-flight instructions from dispatch
//! through retire. It provides:
//! 1. **Allocation:** Assigns unique tags to instructions entering the back end.
//! 2. **Completion:** Marks instructions as done and records branch outcomes.
//! 3. **In-order Commit:** Retires instructions from the head in program order.
//! 4. **Speculation Queries:** Whether an entry sits behind an unresolved or taken branch.
//! 5. **Flush:** Discards every entry when a taken branch retires.

use crate::common::reg::{ArchReg, PhysReg};
use crate::isa::instruction::{DecodedInstruction, Instruction};
use crate::isa::opcode::Opcode;

/// Unique tag identifying an in-flight instruction in the ROB.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct RobTag(pub u32);

/// Lifecycle state of an ROB entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RobState {
    /// Entry allocated but instruction not yet finished executing.
    #[default]
    Issued,
    /// Execution complete, waiting to commit.
    Completed,
}

/// A single entry in the Reorder Buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RobEntry {
    /// Unique tag for this entry.
    pub tag: RobTag,
    /// Fetch address of the instruction.
    pub pc: u32,
    /// Program instruction.
    pub inst: Instruction,
    /// Renamed form; `decoded.dest` is the destination physical register.
    pub decoded: DecodedInstruction,
    /// Architectural destination the register commits under.
    pub arch_dest: Option<ArchReg>,
    /// Current lifecycle state.
    pub state: RobState,
    /// Branch resolved taken.
    pub taken: bool,
    /// Branch target, valid when `taken`.
    pub target: i32,
}

impl RobEntry {
    /// Returns the destination physical register, if any.
    #[inline]
    pub const fn dest(&self) -> Option<PhysReg> {
        self.decoded.dest
    }

    /// Returns true once the instruction has finished executing.
    #[inline]
    pub fn is_completed(&self) -> bool {
        self.state == RobState::Completed
    }

    /// Returns true if younger memory operations must wait for this entry.
    ///
    /// That is any `HALT`, and any branch not yet known to fall through.
    fn blocks_memory(&self) -> bool {
        match self.decoded.opcode {
            Opcode::Halt => true,
            op if op.is_branch() => !self.is_completed() || self.taken,
            _ => false,
        }
    }
}

/// Reorder Buffer: a circular buffer for in-order commit.
#[derive(Clone, Debug)]
pub struct Rob {
    /// Fixed-size entry array.
    entries: Vec<Option<RobEntry>>,
    /// Index of the oldest entry (commit point).
    head: usize,
    /// Index where the next entry will be allocated.
    tail: usize,
    /// Number of valid entries.
    count: usize,
    /// Monotonically increasing tag counter.
    next_tag: u32,
}

impl Rob {
    /// Creates a new ROB with the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: vec![None; capacity],
            head: 0,
            tail: 0,
            count: 0,
            next_tag: 1,
        }
    }

    /// Returns the ROB capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// Returns the number of occupied entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns true if the ROB is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns true if the ROB is full.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.count == self.entries.len()
    }

    /// Returns the number of free slots.
    #[inline]
    pub fn free_slots(&self) -> usize {
        self.entries.len() - self.count
    }

    /// Allocates a new ROB entry at the tail. Returns `None` if the ROB is full.
    pub fn allocate(
        &mut self,
        pc: u32,
        inst: Instruction,
        decoded: DecodedInstruction,
        arch_dest: Option<ArchReg>,
    ) -> Option<RobTag> {
        if self.is_full() {
            return None;
        }

        let tag = RobTag(self.next_tag);
        self.next_tag = self.next_tag.wrapping_add(1);
        if self.next_tag == 0 {
            self.next_tag = 1; // skip 0
        }

        self.entries[self.tail] = Some(RobEntry {
            tag,
            pc,
            inst,
            decoded,
            arch_dest,
            state: RobState::Issued,
            taken: false,
            target: 0,
        });

        self.tail = (self.tail + 1) % self.entries.len();
        self.count += 1;
        Some(tag)
    }

    /// Marks an entry as Completed.
    pub fn complete(&mut self, tag: RobTag) {
        if let Some(entry) = self.find_entry_mut(tag) {
            entry.state = RobState::Completed;
        }
    }

    /// Records a branch outcome. Completion is signalled separately.
    pub fn resolve_branch(&mut self, tag: RobTag, taken: bool, target: i32) {
        if let Some(entry) = self.find_entry_mut(tag) {
            entry.taken = taken;
            entry.target = target;
        }
    }

    /// Returns a reference to the head entry (oldest), if the ROB is non-empty.
    pub fn peek_head(&self) -> Option<&RobEntry> {
        if self.count == 0 {
            None
        } else {
            self.entries[self.head].as_ref()
        }
    }

    /// Returns true if the head entry has completed.
    pub fn can_retire(&self) -> bool {
        self.peek_head().is_some_and(RobEntry::is_completed)
    }

    /// Commits (retires) the head entry.
    /// Returns `None` if the ROB is empty or the head is still Issued.
    pub fn commit_head(&mut self) -> Option<RobEntry> {
        if !self.can_retire() {
            return None;
        }

        let committed = self.entries[self.head].take();
        self.head = (self.head + 1) % self.entries.len();
        self.count -= 1;
        committed
    }

    /// Flushes all entries from the ROB.
    ///
    /// # Returns
    ///
    /// The discarded entries, oldest first.
    pub fn flush_all(&mut self) -> Vec<RobEntry> {
        let mut flushed = Vec::with_capacity(self.count);
        let mut idx = self.head;
        for _ in 0..self.count {
            if let Some(entry) = self.entries[idx].take() {
                flushed.push(entry);
            }
            idx = (idx + 1) % self.entries.len();
        }
        self.head = 0;
        self.tail = 0;
        self.count = 0;
        flushed
    }

    /// Returns true if a memory operation with this tag must not access memory yet:
    /// an older `HALT` is in flight, or an older branch is unresolved or resolved taken.
    pub fn memory_blocked(&self, tag: RobTag) -> bool {
        self.iter()
            .take_while(|entry| entry.tag != tag)
            .any(RobEntry::blocks_memory)
    }

    /// Finds a mutable reference to the entry with the given tag.
    fn find_entry_mut(&mut self, tag: RobTag) -> Option<&mut RobEntry> {
        let len = self.entries.len();
        let mut idx = self.head;
        for _ in 0..self.count {
            if self.entries[idx].is_some_and(|e| e.tag == tag) {
                return self.entries[idx].as_mut();
            }
            idx = (idx + 1) % len;
        }
        None
    }

    /// Iterates over all valid entries from head to tail.
    pub fn iter(&self) -> impl Iterator<Item = &RobEntry> + '_ {
        let len = self.entries.len();
        (0..self.count).filter_map(move |i| self.entries[(self.head + i) % len].as_ref())
    }
}
