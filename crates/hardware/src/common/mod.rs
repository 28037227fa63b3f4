//! Common types used throughout the simulator.
//!
//! This module provides the building blocks shared by every component. It includes:
//! 1. **Error Handling:** Faults, backpressure status and input errors.
//! 2. **Register Identifiers:** Register names, architectural indices and physical indices.

/// Error types and fault definitions.
pub mod error;

/// Register name and index types.
pub mod reg;

pub use error::{Backpressure, ConfigError, Fault, LoadError, SimError};
pub use reg::{ArchReg, PhysReg, RegisterName};
