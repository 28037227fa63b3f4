//! Physical Register Pool.
//!
//! This module owns the physical register arena. Every other component refers to a
//! register by its [`PhysReg`] index, never by holding a copy. It performs:
//! 1. **Storage:** One `{value, valid}` cell per physical register.
//! 2. **Lifecycle:** Resetting a cell when it is allocated or released.
//! 3. **Debugging:** Dumping the arena for the console.

use crate::common::reg::PhysReg;

/// A physical register cell.
///
/// `valid` means the value is architecturally committed. Results written back by a
/// functional unit are visible through forwarding until their producer retires.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PhysicalRegister {
    /// Current value.
    pub value: i32,
    /// Set when the producing instruction commits.
    pub valid: bool,
}

/// Fixed-size arena of physical registers.
#[derive(Clone, Debug)]
pub struct RegisterPool {
    regs: Vec<PhysicalRegister>,
}

impl RegisterPool {
    /// Creates a pool of `size` zeroed, invalid registers.
    pub fn new(size: usize) -> Self {
        Self {
            regs: vec![PhysicalRegister::default(); size],
        }
    }

    /// Returns the number of physical registers.
    #[inline]
    pub fn len(&self) -> usize {
        self.regs.len()
    }

    /// Returns true if the pool has no registers.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.regs.is_empty()
    }

    /// Returns a copy of one register cell.
    #[inline(always)]
    pub fn get(&self, reg: PhysReg) -> PhysicalRegister {
        self.regs[reg.val()]
    }

    /// Stores a value without changing the valid bit.
    #[inline(always)]
    pub fn set_value(&mut self, reg: PhysReg, value: i32) {
        self.regs[reg.val()].value = value;
    }

    /// Sets or clears the valid bit.
    #[inline(always)]
    pub fn set_valid(&mut self, reg: PhysReg, valid: bool) {
        self.regs[reg.val()].valid = valid;
    }

    /// Returns the cell to its zeroed, invalid state.
    pub fn clear(&mut self, reg: PhysReg) {
        self.regs[reg.val()] = PhysicalRegister::default();
    }

    /// Iterates over `(index, cell)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (PhysReg, PhysicalRegister)> + '_ {
        self.regs
            .iter()
            .enumerate()
            .map(|(i, reg)| (PhysReg(i), *reg))
    }
}
