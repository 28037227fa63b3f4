//! Core pipeline tests.

/// Per-opcode results through the whole pipeline.
pub mod opcodes;

/// Register-file conservation and rollback properties.
pub mod rename_properties;

/// End-to-end program scenarios (stores, branches, calls, faults).
pub mod scenarios;

/// Ordering, forwarding and backpressure.
pub mod scheduling;
