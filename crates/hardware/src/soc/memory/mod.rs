//! Data Memory.
//!
//! This module implements the word-addressable data memory used by `LOAD` and `STORE`.
//! It provides:
//! 1. **Checked Access:** Reads and writes that fault on unaligned or out-of-range addresses.
//! 2. **Range Inspection:** Word dumps over an address range for the console.
//! 3. **Access Log:** The most recently written addresses, newest last.

use std::collections::VecDeque;

use crate::common::error::Fault;

/// Bytes per memory word.
pub const WORD_BYTES: usize = 4;

/// Number of written addresses remembered by the access log.
const ACCESS_LOG_DEPTH: usize = 100;

/// Word-addressable data memory of 32-bit signed values.
#[derive(Clone, Debug)]
pub struct DataMemory {
    words: Vec<i32>,
    recent_writes: VecDeque<u32>,
}

impl DataMemory {
    /// Creates a zero-filled memory.
    ///
    /// # Arguments
    ///
    /// * `size_bytes` - Memory size in bytes; rounded down to whole words.
    pub fn new(size_bytes: usize) -> Self {
        Self {
            words: vec![0; size_bytes / WORD_BYTES],
            recent_writes: VecDeque::with_capacity(ACCESS_LOG_DEPTH),
        }
    }

    /// Returns the memory size in bytes.
    #[inline]
    pub fn size(&self) -> usize {
        self.words.len() * WORD_BYTES
    }

    /// Zeroes every word and forgets the access log.
    pub fn clear(&mut self) {
        self.words.fill(0);
        self.recent_writes.clear();
    }

    /// Validates an address and converts it to a word index.
    fn word_index(&self, addr: i32) -> Result<usize, Fault> {
        let in_range = usize::try_from(addr).ok().filter(|&a| a < self.size());
        let Some(byte) = in_range else {
            return Err(Fault::AddressOutOfRange {
                addr,
                size: self.size(),
            });
        };
        if byte % WORD_BYTES != 0 {
            return Err(Fault::UnalignedAddress { addr });
        }
        Ok(byte / WORD_BYTES)
    }

    /// Reads the word at `addr`.
    ///
    /// # Returns
    ///
    /// The stored value, or a fault for an unaligned or out-of-range address.
    pub fn read(&self, addr: i32) -> Result<i32, Fault> {
        Ok(self.words[self.word_index(addr)?])
    }

    /// Writes `value` to the word at `addr` and records the address in the access log.
    pub fn write(&mut self, addr: i32, value: i32) -> Result<(), Fault> {
        let idx = self.word_index(addr)?;
        self.words[idx] = value;
        if self.recent_writes.len() == ACCESS_LOG_DEPTH {
            let _ = self.recent_writes.pop_front();
        }
        self.recent_writes.push_back(addr as u32);
        Ok(())
    }

    /// Returns `(address, value)` for every word from `start` through `end` inclusive.
    ///
    /// Both bounds must be valid word addresses.
    pub fn range(&self, start: i32, end: i32) -> Result<Vec<(i32, i32)>, Fault> {
        let first = self.word_index(start)?;
        let last = self.word_index(end)?;
        Ok((first..=last)
            .map(|idx| ((idx * WORD_BYTES) as i32, self.words[idx]))
            .collect())
    }

    /// Iterates over the most recently written addresses, oldest first.
    pub fn recent_writes(&self) -> impl Iterator<Item = u32> + '_ {
        self.recent_writes.iter().copied()
    }
}
