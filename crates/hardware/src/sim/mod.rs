//! Simulation driver and program loading.
//!
//! Provides the [`Simulator`] that owns the CPU state and the pipeline, and the
//! loader that turns assembly text into instructions.

/// Assembly program loader.
pub mod loader;

/// Top-level simulator.
pub mod simulator;

pub use simulator::Simulator;
