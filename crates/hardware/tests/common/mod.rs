//! Shared test utilities.


/// Sequential reference interpreter.
pub mod reference;
