/*!
 * procmgr
 * Single-machine process-manager simulation: a registry of logical
 * processes, a priority-ordered CPU ready queue, and a bounded memory-block
 * stack, persisted to a flat snapshot file across runs.
 */

pub mod core;
pub mod memory;
pub mod process;
pub mod scheduler;
pub mod storage;
pub mod system;

// Re-exports
pub use crate::core::errors::{ProcessError, SchedulerError, SystemError};
pub use crate::core::limits::{MAX_MEMORY_BLOCKS, PRIORITY_MAX, PRIORITY_MIN};
pub use crate::core::types::{Pid, Priority};
pub use memory::{BlockUsage, MemoryError, MemoryStack};
pub use process::{ProcessInfo, ProcessRegistry};
pub use scheduler::ReadyQueue;
pub use storage::StorageError;
pub use system::System;
