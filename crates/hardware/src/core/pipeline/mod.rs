//! Instruction pipeline implementation.
//!
//! This module contains the out-of-order APEX pipeline. It includes the following
//! components:
//! 1. **Frontend:** In-order Fetch, Decode-1 (rename) and Decode-2 (dispatch).
//! 2. **Backend:** Issue, functional units and in-order commit.
//! 3. **Issue Queue / ROB:** The structures between dispatch and commit.
//! 4. **Latches:** Entries carried between stages.
//! 5. **Signals:** Per-opcode control signals.
//! 6. **Traits:** Common interface for functional-unit latch chains.

/// Backend stages (issue, execute, commit) and functional units.
pub mod backend;

/// Cycle orchestration.
pub mod engine;

/// Frontend stages (fetch, rename, dispatch).
pub mod frontend;

/// Issue queue.
pub mod issue_queue;

/// Inter-stage latch entries.
pub mod latches;

/// Reorder buffer.
pub mod rob;

/// Control signals generated during instruction decode.
pub mod signals;

/// Traits for pipeline components.
pub mod traits;

pub use engine::Pipeline;
