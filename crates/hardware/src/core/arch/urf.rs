//! Unified Register File (URF).
//!
//! The URF tracks which physical register holds each architectural register. It
//! maintains two tables:
//! 1. **RAT:** The speculative mapping, updated at rename.
//! 2. **RRAT:** The committed mapping, updated at retire and copied into the RAT on rollback.
//!
//! Allocation is first-fit over a bitmap, so register reuse is identical from run to run.

use crate::common::error::Backpressure;
use crate::common::reg::{ArchReg, PhysReg};
use crate::core::arch::pool::{PhysicalRegister, RegisterPool};

/// A register released by a commit, with the value it held.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Released {
    /// The register that was returned to the free list.
    pub reg: PhysReg,
    /// Its value just before release.
    pub value: i32,
}

/// Rename tables, allocation bitmap and the physical register arena.
#[derive(Clone, Debug)]
pub struct Urf {
    pool: RegisterPool,
    allocated: Vec<bool>,
    rat: Vec<PhysReg>,
    rrat: Vec<PhysReg>,
}

impl Urf {
    /// Creates a reset URF.
    ///
    /// # Arguments
    ///
    /// * `arch_count` - Number of architectural indices, including `X`.
    /// * `phys_count` - Number of physical registers; must be at least `arch_count`.
    pub fn new(arch_count: usize, phys_count: usize) -> Self {
        debug_assert!(phys_count >= arch_count);
        let mut urf = Self {
            pool: RegisterPool::new(phys_count),
            allocated: vec![false; phys_count],
            rat: vec![PhysReg(0); arch_count],
            rrat: vec![PhysReg(0); arch_count],
        };
        urf.reset();
        urf
    }

    /// Maps architectural index `i` to physical register `i`, committed with value 0,
    /// and frees every other register.
    pub fn reset(&mut self) {
        self.allocated.fill(false);
        for i in 0..self.pool.len() {
            self.pool.clear(PhysReg(i));
        }
        for i in 0..self.rat.len() {
            let reg = PhysReg(i);
            self.rat[i] = reg;
            self.rrat[i] = reg;
            self.allocated[i] = true;
            self.pool.set_valid(reg, true);
        }
    }

    /// Returns the number of architectural indices.
    #[inline]
    pub fn arch_count(&self) -> usize {
        self.rat.len()
    }

    /// Returns the number of physical registers.
    #[inline]
    pub fn phys_count(&self) -> usize {
        self.pool.len()
    }

    /// Returns the number of unallocated physical registers.
    pub fn free_count(&self) -> usize {
        self.allocated.iter().filter(|a| !**a).count()
    }

    /// Allocates the lowest-numbered free register.
    ///
    /// The register comes back zeroed and invalid.
    ///
    /// # Returns
    ///
    /// The register, or `Backpressure::RegisterExhausted` when none is free.
    pub fn allocate(&mut self) -> Result<PhysReg, Backpressure> {
        let idx = self
            .allocated
            .iter()
            .position(|a| !a)
            .ok_or(Backpressure::RegisterExhausted)?;
        self.allocated[idx] = true;
        let reg = PhysReg(idx);
        self.pool.clear(reg);
        Ok(reg)
    }

    /// Installs a speculative mapping for a destination being renamed.
    #[inline]
    pub fn map_rename(&mut self, arch: ArchReg, phys: PhysReg) {
        self.rat[arch.val()] = phys;
    }

    /// Returns the current speculative mapping.
    #[inline]
    pub fn resolve_rename(&self, arch: ArchReg) -> PhysReg {
        self.rat[arch.val()]
    }

    /// Returns the committed mapping.
    #[inline]
    pub fn committed(&self, arch: ArchReg) -> PhysReg {
        self.rrat[arch.val()]
    }

    /// Commits `phys` as the architectural value of `arch` and marks it valid.
    ///
    /// # Returns
    ///
    /// The previously committed register if it was superseded; it has already been
    /// deallocated when this returns.
    pub fn commit(&mut self, arch: ArchReg, phys: PhysReg) -> Option<Released> {
        self.pool.set_valid(phys, true);
        let old = std::mem::replace(&mut self.rrat[arch.val()], phys);
        if old == phys {
            return None;
        }
        let released = Released {
            reg: old,
            value: self.pool.get(old).value,
        };
        self.deallocate(old);
        Some(released)
    }

    /// Returns a register to the free list and clears its contents.
    pub fn deallocate(&mut self, phys: PhysReg) {
        self.allocated[phys.val()] = false;
        self.pool.clear(phys);
    }

    /// Discards every speculative rename: RAT := RRAT.
    pub fn rollback(&mut self) {
        self.rat.clone_from(&self.rrat);
    }

    /// Writes a result without committing it.
    #[inline]
    pub fn write(&mut self, phys: PhysReg, value: i32) {
        self.pool.set_value(phys, value);
    }

    /// Returns the value currently held by a register.
    #[inline]
    pub fn value(&self, phys: PhysReg) -> i32 {
        self.pool.get(phys).value
    }

    /// Returns true if the register's value is committed.
    #[inline]
    pub fn is_valid(&self, phys: PhysReg) -> bool {
        self.pool.get(phys).valid
    }

    /// Returns true if the register is allocated.
    #[inline]
    pub fn is_allocated(&self, phys: PhysReg) -> bool {
        self.allocated[phys.val()]
    }

    /// Returns a copy of one register cell.
    pub fn register(&self, phys: PhysReg) -> PhysicalRegister {
        self.pool.get(phys)
    }

    /// Returns the committed value of an architectural register.
    pub fn architectural_value(&self, arch: ArchReg) -> i32 {
        self.value(self.committed(arch))
    }

    /// Returns the speculative table, indexed by architectural register.
    pub fn rat(&self) -> &[PhysReg] {
        &self.rat
    }

    /// Returns the committed table, indexed by architectural register.
    pub fn rrat(&self) -> &[PhysReg] {
        &self.rrat
    }

    /// Iterates over every allocated register in index order.
    pub fn allocated_registers(&self) -> impl Iterator<Item = PhysReg> + '_ {
        self.allocated
            .iter()
            .enumerate()
            .filter(|(_, a)| **a)
            .map(|(i, _)| PhysReg(i))
    }

    /// Iterates over `(register, cell, allocated)` for the whole arena.
    pub fn registers(&self) -> impl Iterator<Item = (PhysReg, PhysicalRegister, bool)> + '_ {
        self.pool
            .iter()
            .map(|(reg, cell)| (reg, cell, self.allocated[reg.val()]))
    }
}
